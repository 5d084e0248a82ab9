//! HTTP access to the remote university/review store
//!
//! Thin wrapper over the store's PostgREST-style REST surface: filtered,
//! ordered, paginated reads and JSON inserts. Higher-level clients own the
//! query shapes; this layer owns headers, timeouts, and status mapping.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use super::ValidationError;
use crate::config::StoreConfig;

/// Errors surfaced by remote reads.
///
/// Variants carry rendered messages rather than source errors so the type
/// stays cloneable across shared in-flight requests.
#[derive(Debug, Clone, Error)]
pub enum DataFetchError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("network error: {message}")]
    Network { message: String },

    /// The store answered with a non-success status
    #[error("store returned {status}: {message}")]
    Store { status: u16, message: String },

    /// The store answered but the body did not match the expected shape
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },
}

impl From<reqwest::Error> for DataFetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Errors surfaced by remote writes.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Rejected locally before any network call
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Transport-level failure
    #[error("network error: {message}")]
    Network { message: String },

    /// The store rejected the write
    #[error("store returned {status}: {message}")]
    Store { status: u16, message: String },

    /// The store accepted the write but returned an unexpected body
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },
}

impl From<DataFetchError> for SubmissionError {
    fn from(err: DataFetchError) -> Self {
        match err {
            DataFetchError::Network { message } => Self::Network { message },
            DataFetchError::Store { status, message } => Self::Store { status, message },
            DataFetchError::InvalidResponse { message } => Self::InvalidResponse { message },
        }
    }
}

/// Client for the hosted table store.
///
/// Every request carries the project API key as both the `apikey` header and
/// a bearer token, the way the hosted store expects anonymous table access.
#[derive(Debug, Clone)]
pub struct StoreClient {
    /// HTTP client with default headers and timeout baked in
    http: reqwest::Client,
    /// Base URL of the store, without a trailing slash
    base_url: String,
}

impl StoreClient {
    /// Builds a client from connection settings.
    pub fn new(config: &StoreConfig) -> Result<Self, DataFetchError> {
        let key = HeaderValue::from_str(&config.api_key).map_err(|e| DataFetchError::Network {
            message: format!("invalid API key value: {}", e),
        })?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|e| {
            DataFetchError::Network {
                message: format!("invalid API key value: {}", e),
            }
        })?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert("apikey", key);
        default_headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| DataFetchError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// REST endpoint for a table
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Reads rows from `table`, shaped by PostgREST query parameters
    /// (`select`, filters, `order`, `limit`, `offset`).
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, DataFetchError> {
        let url = self.table_url(table);
        debug!(url = %url, "reading from store");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DataFetchError::Store {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| DataFetchError::InvalidResponse {
            message: format!("failed to decode {} rows: {}", table, e),
        })
    }

    /// Inserts one row and returns the representation the store sends back.
    pub async fn insert_returning<B, T>(&self, table: &str, row: &B) -> Result<T, SubmissionError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.post_json(table, row, "return=representation").await?;

        // The store wraps inserted rows in an array
        let rows: Vec<T> =
            serde_json::from_str(&body).map_err(|e| SubmissionError::InvalidResponse {
                message: format!("failed to decode row inserted into {}: {}", table, e),
            })?;

        rows.into_iter()
            .next()
            .ok_or_else(|| SubmissionError::InvalidResponse {
                message: format!("store returned no rows for insert into {}", table),
            })
    }

    /// Inserts one row without asking for the created representation back.
    pub async fn insert<B: Serialize + ?Sized>(
        &self,
        table: &str,
        row: &B,
    ) -> Result<(), SubmissionError> {
        self.post_json(table, row, "return=minimal").await?;
        Ok(())
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        table: &str,
        row: &B,
        prefer: &str,
    ) -> Result<String, DataFetchError> {
        let url = self.table_url(table);
        debug!(url = %url, "inserting into store");

        let response = self
            .http
            .post(&url)
            .header("Prefer", prefer)
            .json(row)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DataFetchError::Store {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }
}
