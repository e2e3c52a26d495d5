//! Error types for telegram-client.

use thiserror::Error;

/// Errors that can occur when interacting with the Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The Bot API returned `ok: false`.
    #[error("API error {code}: {description}")]
    Api { code: i32, description: String },

    /// Health check failed.
    #[error("Health check failed")]
    HealthCheckFailed,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TelegramError {
    /// Whether the error means the chat can no longer be messaged
    /// (bot blocked, chat deleted).
    pub fn is_unreachable(&self) -> bool {
        matches!(self, TelegramError::Api { code: 403, .. })
    }
}
