//! Inbound and outbound message types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a chat user. For Telegram this is the private chat id.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A message received from a user.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Who sent the message.
    pub sender: UserId,
    /// Raw message text.
    pub text: String,
    /// Unix timestamp in seconds as reported by the transport.
    pub timestamp: u64,
    /// Language tags the client reported for the user (e.g. `["en-US"]`).
    pub language_tags: Vec<String>,
}

impl InboundMessage {
    /// Create a message with no language information.
    pub fn new(sender: impl Into<UserId>, text: impl Into<String>, timestamp: u64) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            timestamp,
            language_tags: Vec::new(),
        }
    }

    /// Attach a client-reported language tag.
    pub fn with_language(mut self, tag: impl Into<String>) -> Self {
        self.language_tags.push(tag.into());
        self
    }

    /// The text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Whether the text is a slash command such as `/start`.
    pub fn is_command(&self) -> bool {
        self.trimmed().starts_with('/')
    }

    /// The command name without the slash and without a `@botname` suffix.
    pub fn command(&self) -> Option<&str> {
        let text = self.trimmed().strip_prefix('/')?;
        let word = text.split_whitespace().next().unwrap_or("");
        Some(word.split('@').next().unwrap_or(word))
    }
}

/// A message to deliver to a user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutboundMessage {
    /// Who receives the message.
    pub recipient: UserId,
    /// Message text.
    pub text: String,
    /// Selectable short replies, rendered as a one-time keyboard.
    /// Empty means any previous keyboard is removed.
    pub choices: Vec<String>,
}

impl OutboundMessage {
    /// Create a plain text message.
    pub fn text(recipient: UserId, text: impl Into<String>) -> Self {
        Self {
            recipient,
            text: text.into(),
            choices: Vec::new(),
        }
    }

    /// Create a reply to an inbound message.
    pub fn reply_to(message: &InboundMessage, text: impl Into<String>) -> Self {
        Self::text(message.sender, text)
    }

    /// Attach a choice list.
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the message carries a choice list.
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }
}
