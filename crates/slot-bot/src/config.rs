//! Bot configuration and top-level errors.

use std::env;
use std::time::Duration;

use slot_watcher::ConfigError;
use supplies_api::SuppliesApiError;
use supply_core::UserId;
use telegram_client::TelegramError;
use thiserror::Error;

/// Idle time after which a user's worker task exits.
pub const DEFAULT_WORKER_IDLE: Duration = Duration::from_secs(300);

/// Messages buffered per user before new ones are dropped.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Errors that stop the bot.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("telegram error: {0}")]
    Telegram(#[from] TelegramError),

    #[error("supplies api error: {0}")]
    Supplies(#[from] SuppliesApiError),

    #[error("watcher config error: {0}")]
    Watcher(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// The update stream ended.
    #[error("update stream ended")]
    StreamEnded,
}

/// Dispatch settings for the bot.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Chat allowed to use the admin panel.
    pub admin_chat_id: Option<UserId>,
    pub worker_idle: Duration,
    pub queue_capacity: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            admin_chat_id: None,
            worker_idle: DEFAULT_WORKER_IDLE,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl BotConfig {
    pub fn with_admin(admin: impl Into<UserId>) -> Self {
        Self {
            admin_chat_id: Some(admin.into()),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `ADMIN_CHAT_ID` (admin panel disabled when unset)
    /// - `BOT_WORKER_IDLE_SECS` (default: 300)
    pub fn from_env() -> Result<Self, BotError> {
        let mut config = Self::default();

        if let Ok(value) = env::var("ADMIN_CHAT_ID") {
            let id = value
                .trim()
                .parse::<i64>()
                .map_err(|_| BotError::Config(format!("ADMIN_CHAT_ID is not a chat id: {:?}", value)))?;
            config.admin_chat_id = Some(UserId(id));
        }

        if let Ok(value) = env::var("BOT_WORKER_IDLE_SECS") {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_err(|_| BotError::Config(format!("BOT_WORKER_IDLE_SECS is not a number: {:?}", value)))?;
            config.worker_idle = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn is_admin(&self, user: UserId) -> bool {
        self.admin_chat_id == Some(user)
    }
}
