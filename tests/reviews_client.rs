//! Integration tests for ReviewsClient.
//!
//! Uses wiremock for the remote store. Covers canonical ordering,
//! pagination parameters, local validation short-circuits, and
//! submit-then-list visibility.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use unirate::config::StoreConfig;
use unirate::data::{NewReview, Page, ReviewsClient, StoreClient, SubmissionError, ValidationError};

fn test_client(mock_server: &MockServer) -> ReviewsClient {
    let store = StoreClient::new(&StoreConfig::new(mock_server.uri(), "test-key"))
        .expect("client should build");
    ReviewsClient::new(store)
}

fn review_rows() -> serde_json::Value {
    json!([
        {
            "id": 12,
            "university_id": 7,
            "author_name": "Ana",
            "rating": 5,
            "comment": "Great",
            "created_at": "2026-08-01T09:00:00Z"
        },
        {
            "id": 11,
            "university_id": 7,
            "author_name": null,
            "rating": 2,
            "comment": "noob.",
            "created_at": "2026-07-20T15:45:00Z"
        }
    ])
}

#[tokio::test]
async fn test_list_reviews_requests_newest_first() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/review"))
        .and(query_param("university_id", "eq.7"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(review_rows()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reviews = test_client(&mock_server)
        .list_reviews(7, None)
        .await
        .expect("listing should succeed");

    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].id, 12, "Newest review comes first");
    assert_eq!(reviews[1].author_label(), "Anonymous");
}

#[tokio::test]
async fn test_list_reviews_passes_page_slice() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/review"))
        .and(query_param("university_id", "eq.7"))
        .and(query_param("limit", "5"))
        .and(query_param("offset", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reviews = test_client(&mock_server)
        .list_reviews(7, Some(Page::new(2, 5)))
        .await
        .expect("listing should succeed");

    assert!(reviews.is_empty());
}

#[tokio::test]
async fn test_submit_review_returns_created_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/review"))
        .and(header("prefer", "return=representation"))
        .and(body_partial_json(json!({
            "university_id": 7,
            "author_name": "Ana",
            "rating": 5,
            "comment": "Great"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": 99,
            "university_id": 7,
            "author_name": "Ana",
            "rating": 5,
            "comment": "Great",
            "created_at": "2026-08-05T12:00:00Z"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let review = NewReview {
        university_id: 7,
        author_name: Some("Ana".to_string()),
        rating: 5,
        comment: "Great".to_string(),
    };
    let created = test_client(&mock_server)
        .submit_review(&review)
        .await
        .expect("submission should succeed");

    assert_eq!(created.id, 99);
    assert_eq!(created.rating, 5);
}

#[tokio::test]
async fn test_out_of_range_ratings_never_reach_the_store() {
    // No POST mock mounted: a remote call would fail loudly
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    for rating in [0, 6] {
        let review = NewReview {
            university_id: 7,
            author_name: None,
            rating,
            comment: "Great".to_string(),
        };
        let error = client
            .submit_review(&review)
            .await
            .expect_err("rating should be rejected locally");
        assert!(matches!(
            error,
            SubmissionError::Invalid(ValidationError::RatingOutOfRange(r)) if r == rating
        ));
    }

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty(), "Validation failures must not hit the network");
}

#[tokio::test]
async fn test_blank_comment_never_reaches_the_store() {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    let review = NewReview {
        university_id: 7,
        author_name: None,
        rating: 4,
        comment: "   ".to_string(),
    };
    let error = client
        .submit_review(&review)
        .await
        .expect_err("blank comment should be rejected locally");

    assert!(matches!(
        error,
        SubmissionError::Invalid(ValidationError::EmptyComment)
    ));

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_store_rejection_surfaces_submission_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/review"))
        .respond_with(ResponseTemplate::new(500).set_body_string("insert failed"))
        .mount(&mock_server)
        .await;

    let review = NewReview {
        university_id: 7,
        author_name: None,
        rating: 3,
        comment: "ok".to_string(),
    };
    let error = test_client(&mock_server)
        .submit_review(&review)
        .await
        .expect_err("store failure should surface");

    match error {
        SubmissionError::Store { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "insert failed");
        }
        other => panic!("expected Store error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_submitted_review_is_first_in_subsequent_listing() {
    let mock_server = MockServer::start().await;

    let created = json!({
        "id": 100,
        "university_id": 7,
        "author_name": "Ana",
        "rating": 5,
        "comment": "Great",
        "created_at": "2026-08-05T12:00:00Z"
    });

    Mock::given(method("POST"))
        .and(path("/rest/v1/review"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([created.clone()])))
        .mount(&mock_server)
        .await;
    // The listing reflects the store's state after the insert, newest first
    Mock::given(method("GET"))
        .and(path("/rest/v1/review"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            created,
            {
                "id": 11,
                "university_id": 7,
                "author_name": null,
                "rating": 2,
                "comment": "noob.",
                "created_at": "2026-07-20T15:45:00Z"
            }
        ])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let review = NewReview {
        university_id: 7,
        author_name: Some("Ana".to_string()),
        rating: 5,
        comment: "Great".to_string(),
    };

    let submitted = client.submit_review(&review).await.expect("submit");
    let listing = client.list_reviews(7, None).await.expect("list");

    assert_eq!(listing.first(), Some(&submitted));
}
