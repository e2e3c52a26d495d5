//! Message sender trait and implementations.

use async_trait::async_trait;

use crate::error::SendError;
use crate::message::OutboundMessage;

/// Trait for delivering messages to users.
///
/// Abstracted to support different transports (Telegram, tests, etc.)
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a message, rendering its choice list if it has one.
    async fn send(&self, message: &OutboundMessage) -> Result<(), SendError>;

    /// Send several messages in order, stopping at the first failure.
    async fn send_all(&self, messages: &[OutboundMessage]) -> Result<(), SendError> {
        for message in messages {
            self.send(message).await?;
        }
        Ok(())
    }
}

/// A no-op message sender that discards all messages.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send(&self, _message: &OutboundMessage) -> Result<(), SendError> {
        Ok(())
    }
}

/// A logging message sender for debugging that logs all operations.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send(&self, message: &OutboundMessage) -> Result<(), SendError> {
        tracing::info!(
            "Sending message to {} ({} choices): {}",
            message.recipient,
            message.choices.len(),
            message.text
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::UserId;

    #[tokio::test]
    async fn test_noop_sender() {
        let sender = NoOpSender;
        sender
            .send(&OutboundMessage::text(UserId(1), "test"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_logging_sender_send_all() {
        let sender = LoggingSender;
        let messages = vec![
            OutboundMessage::text(UserId(1), "one"),
            OutboundMessage::text(UserId(1), "two").with_choices(["a"]),
        ];
        sender.send_all(&messages).await.unwrap();
    }
}
