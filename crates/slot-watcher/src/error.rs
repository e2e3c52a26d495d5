//! Error types for the watch engine.

use supply_core::UserId;
use thiserror::Error;

use crate::state::Stage;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be parsed.
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Errors raised by the watch scheduler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// The user already has a running watch.
    #[error("user {0} already has an active watch")]
    AlreadyActive(UserId),
}

/// A conversation field was set before the fields that precede it.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot set {attempted:?} while the conversation is at {current:?}")]
pub struct OutOfOrder {
    pub current: Stage,
    pub attempted: Stage,
}
