//! Update and message types received from the Bot API.

use serde::{Deserialize, Serialize};

/// An incoming update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Update {
    /// Monotonic update identifier, used as the polling offset.
    pub update_id: i64,

    /// New incoming message of any kind.
    #[serde(default)]
    pub message: Option<Message>,
}

/// A chat message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,

    /// Unix time the message was sent.
    #[serde(default)]
    pub date: u64,

    pub chat: Chat,

    /// Sender, empty for messages sent to channels.
    #[serde(default)]
    pub from: Option<User>,

    /// Text of a text message.
    #[serde(default)]
    pub text: Option<String>,
}

impl Message {
    /// Whether the message was sent in a one-to-one chat with the bot.
    pub fn is_private(&self) -> bool {
        self.chat.kind == "private"
    }
}

/// A chat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,

    /// "private", "group", "supergroup" or "channel".
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// A Telegram user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    #[serde(default)]
    pub is_bot: bool,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub username: Option<String>,

    /// IETF language tag of the user's client.
    #[serde(default)]
    pub language_code: Option<String>,
}

/// Result of `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}
