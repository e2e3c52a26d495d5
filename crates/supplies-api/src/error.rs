//! Error types for supplies-api.

use supply_core::FetchError;
use thiserror::Error;

/// Errors that can occur when talking to the supplies API.
#[derive(Debug, Error)]
pub enum SuppliesApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<SuppliesApiError> for FetchError {
    fn from(err: SuppliesApiError) -> Self {
        match err {
            SuppliesApiError::Http(e) if e.is_timeout() => FetchError::Timeout,
            SuppliesApiError::Http(e) if e.is_decode() => FetchError::InvalidResponse(e.to_string()),
            SuppliesApiError::Http(e) => FetchError::Unavailable(e.to_string()),
            SuppliesApiError::Json(e) => FetchError::InvalidResponse(e.to_string()),
            SuppliesApiError::Status { status, body } => FetchError::Status { status, body },
            SuppliesApiError::Config(msg) => FetchError::Unavailable(msg),
        }
    }
}
