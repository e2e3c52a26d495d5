//! Telegram front end for the slot watcher.
//!
//! Wires the Telegram update stream into [`SlotWatcher`](slot_watcher::SlotWatcher):
//! updates are converted to [`InboundMessage`](supply_core::InboundMessage)s,
//! dispatched to one worker per user so each user's messages are handled in
//! order, and replies go back out through [`TelegramSender`].

pub mod config;
pub mod dispatcher;
pub mod inbound;
pub mod sender;

pub use config::{BotConfig, BotError};
pub use dispatcher::Dispatcher;
pub use inbound::UpdateExt;
pub use sender::TelegramSender;
