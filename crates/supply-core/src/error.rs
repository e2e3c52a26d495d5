//! Error types for the external collaborators.

use thiserror::Error;

/// Errors returned by a [`SuppliesProvider`](crate::SuppliesProvider).
#[derive(Debug, Error)]
pub enum FetchError {
    /// The upstream service could not be reached.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    /// The upstream service answered with a non-success status.
    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The request timed out.
    #[error("request timed out")]
    Timeout,
}

/// Errors returned by a [`MessageSender`](crate::MessageSender).
#[derive(Debug, Error)]
pub enum SendError {
    /// The transport rejected or failed to deliver the message.
    #[error("send failed: {0}")]
    Failed(String),

    /// The recipient cannot receive messages (blocked the bot, deleted chat).
    #[error("recipient {0} is unreachable")]
    Unreachable(String),
}
