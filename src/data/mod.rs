//! Core data models for the university review directory
//!
//! This module contains the client-visible shapes of the remote store's
//! records, the local validation rules applied before writes, and the
//! clients that talk to the store.

pub mod directory;
pub mod reviews;
pub mod store;
pub mod suggestions;

pub use directory::{DirectoryCache, DirectoryClient};
pub use reviews::{NewReview, Page, ReviewsClient};
pub use store::{DataFetchError, StoreClient, SubmissionError};
pub use suggestions::{NewSuggestion, SuggestionsClient};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A university record as exposed by the remote store.
///
/// The full-collection read uses a narrow column projection, so every field
/// that projection omits is optional here and deserializes to `None`. The
/// point read selects all columns and fills them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct University {
    /// Opaque identity assigned by the store
    pub id: i64,
    /// Unique short identifier, matched case-insensitively on lookup
    pub acronym: String,
    /// Display name
    pub name: String,
    /// Location text, absent in the narrow projection
    #[serde(default)]
    pub location: Option<String>,
    /// Website URL, absent in the narrow projection
    #[serde(default)]
    pub website: Option<String>,
    /// Image reference
    #[serde(default)]
    pub picture: Option<String>,
}

/// A review belonging to exactly one university.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub university_id: i64,
    /// Author name; absent reviews render as "Anonymous"
    #[serde(default)]
    pub author_name: Option<String>,
    /// Star rating, always within 1..=5
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Display name for the review author.
    pub fn author_label(&self) -> &str {
        self.author_name.as_deref().unwrap_or("Anonymous")
    }
}

/// Local precondition failures, raised before any network call.
///
/// These are a UX optimization, not a security boundary; the remote store
/// remains the final authority on its own constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Rating outside the accepted 1..=5 range
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),

    /// Review comment missing or blank
    #[error("comment must not be empty")]
    EmptyComment,

    /// Required name field missing or blank
    #[error("name must not be empty")]
    EmptyName,
}
