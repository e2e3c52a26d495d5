//! Bot API request and response types.

mod send;
mod update;

pub use send::{
    GetUpdatesParams, KeyboardButton, ReplyKeyboardMarkup, ReplyKeyboardRemove, ReplyMarkup,
    SendMessageParams,
};
pub use update::{BotUser, Chat, Message, Update, User};
