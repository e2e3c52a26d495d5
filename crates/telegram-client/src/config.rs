//! Configuration types for telegram-client.

use std::env;
use std::time::Duration;

use crate::error::TelegramError;

/// Public Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Configuration for connecting to the Bot API.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Base URL of the Bot API server.
    pub api_url: String,
    /// Bot token issued by BotFather.
    pub token: String,
    /// Long-poll timeout passed to `getUpdates`.
    pub poll_timeout: Duration,
}

impl TelegramConfig {
    /// Create a configuration for the public Bot API.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            poll_timeout: Duration::from_secs(25),
        }
    }

    /// Use a self-hosted Bot API server.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `TELEGRAM_BOT_TOKEN`
    ///
    /// Optional env vars:
    /// - `TELEGRAM_API_URL` (default: https://api.telegram.org)
    /// - `TELEGRAM_POLL_TIMEOUT_SECS` (default: 25)
    pub fn from_env() -> Result<Self, TelegramError> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| TelegramError::Config("TELEGRAM_BOT_TOKEN not set".to_string()))?;

        let mut config = Self::new(token);
        if let Ok(url) = env::var("TELEGRAM_API_URL") {
            config = config.with_api_url(url);
        }
        if let Some(secs) = env::var("TELEGRAM_POLL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.poll_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Get the URL of a Bot API method.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    /// HTTP timeout: the long-poll window plus headroom for the response.
    pub fn http_timeout(&self) -> Duration {
        self.poll_timeout + Duration::from_secs(10)
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("poll_timeout", &self.poll_timeout)
            .finish()
    }
}
