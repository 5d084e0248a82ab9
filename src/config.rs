//! Environment-driven configuration for the remote store connection
//!
//! The store URL and API key have no sensible defaults; the binary refuses
//! to start without them. The request timeout can be overridden for slow
//! links.

use std::env;

use thiserror::Error;
use tracing::info;

/// Default per-request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    /// An environment variable is set but does not parse
    #[error("invalid value for {var}: {message}")]
    InvalidVar { var: &'static str, message: String },
}

/// Connection settings for the remote store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the hosted store, e.g. `https://project.supabase.co`
    pub url: String,
    /// Project API key, sent as both `apikey` header and bearer token
    pub api_key: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// Creates settings with the default timeout.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Loads settings from `UNIRATE_STORE_URL`, `UNIRATE_STORE_KEY`, and the
    /// optional `UNIRATE_TIMEOUT_SECS` override.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url =
            env::var("UNIRATE_STORE_URL").map_err(|_| ConfigError::MissingVar("UNIRATE_STORE_URL"))?;
        let api_key =
            env::var("UNIRATE_STORE_KEY").map_err(|_| ConfigError::MissingVar("UNIRATE_STORE_KEY"))?;

        let timeout_secs = match env::var("UNIRATE_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|e| ConfigError::InvalidVar {
                var: "UNIRATE_TIMEOUT_SECS",
                message: format!("{}", e),
            })?,
            Err(_) => {
                info!("UNIRATE_TIMEOUT_SECS not set, using default: {DEFAULT_TIMEOUT_SECS}");
                DEFAULT_TIMEOUT_SECS
            }
        };

        Ok(Self {
            url,
            api_key,
            timeout_secs,
        })
    }
}
