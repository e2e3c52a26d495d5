//! Delivers outbound messages through the Bot API.

use supply_core::{async_trait, MessageSender, OutboundMessage, SendError};
use telegram_client::{SendMessageParams, TelegramClient, TelegramError};
use tracing::debug;

/// [`MessageSender`] backed by a [`TelegramClient`].
///
/// Choice lists become one-time reply keyboards; messages without choices
/// remove any keyboard left over from an earlier prompt.
#[derive(Clone)]
pub struct TelegramSender {
    client: TelegramClient,
}

impl TelegramSender {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }
}

/// Bot API parameters for a message.
pub fn to_params(message: &OutboundMessage) -> SendMessageParams {
    let params = SendMessageParams::text(message.recipient.0, message.text.as_str());
    if message.has_choices() {
        params.with_keyboard(message.choices.iter().cloned())
    } else {
        params.remove_keyboard()
    }
}

fn to_send_error(message: &OutboundMessage, error: TelegramError) -> SendError {
    if error.is_unreachable() {
        SendError::Unreachable(message.recipient.to_string())
    } else {
        SendError::Failed(error.to_string())
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send(&self, message: &OutboundMessage) -> Result<(), SendError> {
        let sent = self
            .client
            .send(to_params(message))
            .await
            .map_err(|e| to_send_error(message, e))?;
        debug!("Delivered message {} to {}", sent.message_id, message.recipient);
        Ok(())
    }
}
