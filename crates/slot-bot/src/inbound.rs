//! Conversion of Telegram updates into engine messages.

use supply_core::{InboundMessage, UserId};
use telegram_client::{Message, Update};

/// Extension trait for converting a Telegram [`Update`] to an [`InboundMessage`].
pub trait UpdateExt {
    /// Convert to an InboundMessage if this update is a text message in a
    /// private chat from a human.
    ///
    /// Returns `None` for group chats, bots, edits and non-text messages.
    fn to_inbound_message(&self) -> Option<InboundMessage>;
}

impl UpdateExt for Update {
    fn to_inbound_message(&self) -> Option<InboundMessage> {
        let message = self.message.as_ref()?;
        convert(message)
    }
}

fn convert(message: &Message) -> Option<InboundMessage> {
    if !message.is_private() {
        return None;
    }
    if message.from.as_ref().is_some_and(|user| user.is_bot) {
        return None;
    }
    let text = message.text.clone()?;

    // Private chat ids equal the user's id, and replies go to the chat.
    let mut inbound = InboundMessage::new(UserId(message.chat.id), text, message.date);
    if let Some(tag) = message.from.as_ref().and_then(|u| u.language_code.clone()) {
        inbound = inbound.with_language(tag);
    }
    Some(inbound)
}
