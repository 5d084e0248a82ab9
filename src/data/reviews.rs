//! Review listing and submission
//!
//! Reviews always go straight to the remote store; nothing here touches the
//! directory cache, so a freshly submitted review is visible to the very
//! next listing. Listings use one canonical order, newest first.

use serde::Serialize;
use tracing::debug;

use super::store::{DataFetchError, StoreClient, SubmissionError};
use super::{Review, ValidationError};

/// Inclusive rating bounds
const MIN_RATING: u8 = 1;
const MAX_RATING: u8 = 5;

/// A page-based slice of a review listing. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number
    pub number: u32,
    /// Rows per page
    pub size: u32,
}

impl Page {
    pub fn new(number: u32, size: u32) -> Self {
        Self { number, size }
    }

    /// Row offset of the first element on this page
    pub fn offset(&self) -> u32 {
        self.number.saturating_sub(1) * self.size
    }
}

/// Insert shape for a new review.
#[derive(Debug, Clone, Serialize)]
pub struct NewReview {
    pub university_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub rating: u8,
    pub comment: String,
}

impl NewReview {
    /// Checks local preconditions before any network call.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange(self.rating));
        }
        if self.comment.trim().is_empty() {
            return Err(ValidationError::EmptyComment);
        }
        Ok(())
    }
}

/// Client for the `review` table.
#[derive(Debug, Clone)]
pub struct ReviewsClient {
    store: StoreClient,
}

impl ReviewsClient {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Reviews for one university, newest first.
    ///
    /// # Arguments
    /// * `university_id` - The owning university
    /// * `page` - Optional slice; offset is `(number - 1) * size`
    pub async fn list_reviews(
        &self,
        university_id: i64,
        page: Option<Page>,
    ) -> Result<Vec<Review>, DataFetchError> {
        let mut query = vec![
            ("select", "*".to_string()),
            ("university_id", format!("eq.{}", university_id)),
            ("order", "created_at.desc".to_string()),
        ];
        if let Some(page) = page {
            query.push(("limit", page.size.to_string()));
            query.push(("offset", page.offset().to_string()));
        }

        self.store.select("review", &query).await
    }

    /// Validates locally, then inserts the review and returns the created
    /// row as the store recorded it.
    ///
    /// Validation failures never reach the network; remote failures surface
    /// as `SubmissionError` and leave the caller's input untouched for
    /// retry.
    pub async fn submit_review(&self, review: &NewReview) -> Result<Review, SubmissionError> {
        review.validate()?;
        debug!(
            university_id = review.university_id,
            rating = review.rating,
            "submitting review"
        );
        self.store.insert_returning("review", review).await
    }
}
