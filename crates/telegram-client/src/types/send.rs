//! Types for sending messages via the Bot API.

use serde::Serialize;

/// Parameters for `sendMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageParams {
    pub chat_id: i64,

    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

impl SendMessageParams {
    /// Create params for a plain text message.
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            reply_markup: None,
        }
    }

    /// Attach a one-time keyboard with one button per row.
    pub fn with_keyboard<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keyboard = choices
            .into_iter()
            .map(|text| vec![KeyboardButton { text: text.into() }])
            .collect();
        self.reply_markup = Some(ReplyMarkup::Keyboard(ReplyKeyboardMarkup {
            keyboard,
            one_time_keyboard: true,
            resize_keyboard: true,
        }));
        self
    }

    /// Ask the client to hide any previously shown keyboard.
    pub fn remove_keyboard(mut self) -> Self {
        self.reply_markup = Some(ReplyMarkup::Remove(ReplyKeyboardRemove {
            remove_keyboard: true,
        }));
        self
    }
}

/// Reply markup variants.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Keyboard(ReplyKeyboardMarkup),
    Remove(ReplyKeyboardRemove),
}

/// A custom reply keyboard.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub one_time_keyboard: bool,
    pub resize_keyboard: bool,
}

/// A keyboard button whose text is sent back as a message.
#[derive(Debug, Clone, Serialize)]
pub struct KeyboardButton {
    pub text: String,
}

/// Removes the current custom keyboard.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyKeyboardRemove {
    pub remove_keyboard: bool,
}

/// Parameters for `getUpdates`.
#[derive(Debug, Clone, Serialize)]
pub struct GetUpdatesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    /// Long-poll timeout in seconds.
    pub timeout: u64,

    pub allowed_updates: Vec<String>,
}
