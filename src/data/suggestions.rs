//! Suggestion box submissions
//!
//! New-school suggestions go into their own table. Only the name is
//! required; extra details help but are optional.

use serde::Serialize;
use tracing::debug;

use super::store::{StoreClient, SubmissionError};
use super::ValidationError;

/// Insert shape for a suggested school.
#[derive(Debug, Clone, Serialize)]
pub struct NewSuggestion {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl NewSuggestion {
    /// Checks local preconditions before any network call.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }
}

/// Client for the `suggestion_box` table.
#[derive(Debug, Clone)]
pub struct SuggestionsClient {
    store: StoreClient,
}

impl SuggestionsClient {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Validates locally, then inserts the suggestion. The store's
    /// acknowledgement is all the caller needs back.
    pub async fn submit_suggestion(
        &self,
        suggestion: &NewSuggestion,
    ) -> Result<(), SubmissionError> {
        suggestion.validate()?;
        debug!(name = %suggestion.name, "submitting school suggestion");
        self.store.insert("suggestion_box", suggestion).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_name_only() {
        let suggestion = NewSuggestion {
            name: "University of the Philippines".to_string(),
            location: None,
            acronym: None,
            website: None,
        };
        assert!(suggestion.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let suggestion = NewSuggestion {
            name: "  ".to_string(),
            location: Some("Quezon City".to_string()),
            acronym: None,
            website: None,
        };
        assert_eq!(suggestion.validate(), Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_optional_fields_are_omitted_from_insert_body() {
        let suggestion = NewSuggestion {
            name: "Mapúa University".to_string(),
            location: None,
            acronym: Some("MU".to_string()),
            website: None,
        };

        let body = serde_json::to_value(&suggestion).expect("Should serialize");

        assert_eq!(body["name"], "Mapúa University");
        assert_eq!(body["acronym"], "MU");
        assert!(body.get("location").is_none());
        assert!(body.get("website").is_none());
    }
}
