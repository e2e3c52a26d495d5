//! Bot API HTTP client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::TelegramConfig;
use crate::error::TelegramError;
use crate::types::{BotUser, GetUpdatesParams, Message, SendMessageParams, Update};

/// Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i32>,
}

/// Client for the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    config: TelegramConfig,
    connected: Arc<AtomicBool>,
}

impl TelegramClient {
    /// Create a client and verify the token with `getMe`.
    pub async fn connect(config: TelegramConfig) -> Result<Self, TelegramError> {
        let client = Self::new(config)?;

        let me = client.get_me().await?;
        client.connected.store(true, Ordering::SeqCst);
        info!(
            "Connected to Bot API at {} as @{}",
            client.config.api_url,
            me.username.as_deref().unwrap_or("unknown")
        );

        Ok(client)
    }

    /// Create a client without contacting the API.
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        if config.token.is_empty() {
            return Err(TelegramError::Config("bot token is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(TelegramError::Http)?;

        Ok(Self {
            http,
            config,
            connected: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Check if the last health check succeeded.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Perform a health check against the API.
    pub async fn health_check(&self) -> Result<bool, TelegramError> {
        match self.get_me().await {
            Ok(_) => {
                self.connected.store(true, Ordering::SeqCst);
                Ok(true)
            }
            Err(TelegramError::Api { .. }) => {
                self.connected.store(false, Ordering::SeqCst);
                Ok(false)
            }
            Err(e) => {
                self.connected.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Get the bot's own account.
    pub async fn get_me(&self) -> Result<BotUser, TelegramError> {
        self.call::<(), _>("getMe", None).await
    }

    /// Send a message using the full params structure.
    pub async fn send(&self, params: SendMessageParams) -> Result<Message, TelegramError> {
        self.call("sendMessage", Some(params)).await
    }

    /// Send a text message to a chat.
    pub async fn send_text(&self, chat_id: i64, text: &str) -> Result<Message, TelegramError> {
        self.send(SendMessageParams::text(chat_id, text)).await
    }

    /// Send a text message with a one-time reply keyboard.
    pub async fn send_with_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        choices: &[String],
    ) -> Result<Message, TelegramError> {
        let params = SendMessageParams::text(chat_id, text).with_keyboard(choices.iter().cloned());
        self.send(params).await
    }

    /// Fetch pending updates, long-polling for up to the configured timeout.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdatesParams {
            offset,
            timeout: self.config.poll_timeout.as_secs(),
            allowed_updates: vec!["message".to_string()],
        };
        self.call("getUpdates", Some(params)).await
    }

    /// Start a background health monitor that periodically checks the API.
    pub fn start_health_monitor(&self, interval: Duration) -> JoinHandle<()> {
        let client = self.clone();

        tokio::spawn(async move {
            let mut consecutive_failures = 0u32;

            loop {
                tokio::time::sleep(interval).await;

                match client.health_check().await {
                    Ok(true) => {
                        if consecutive_failures > 0 {
                            info!("Bot API connection restored");
                        }
                        consecutive_failures = 0;
                    }
                    Ok(false) => {
                        consecutive_failures += 1;
                        warn!(
                            "Health check returned not OK (failures: {})",
                            consecutive_failures
                        );
                    }
                    Err(e) => {
                        consecutive_failures += 1;
                        error!(
                            "Health check failed: {} (failures: {})",
                            e, consecutive_failures
                        );
                    }
                }
            }
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &TelegramConfig {
        &self.config
    }

    /// Call a Bot API method.
    async fn call<P: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: Option<P>,
    ) -> Result<R, TelegramError> {
        let url = self.config.method_url(method);
        debug!("Bot API call: {}", method);

        let mut request = self.http.post(&url);
        if let Some(params) = params {
            request = request.json(&params);
        }

        let response = request.send().await.map_err(TelegramError::Http)?;
        let status = response.status();
        let body = response.text().await.map_err(TelegramError::Http)?;

        let api_response: ApiResponse<R> = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::Api {
                    code: i32::from(status.as_u16()),
                    description: body,
                });
            }
            Err(e) => return Err(TelegramError::Json(e)),
        };

        if !api_response.ok {
            return Err(TelegramError::Api {
                code: api_response
                    .error_code
                    .unwrap_or_else(|| i32::from(status.as_u16())),
                description: api_response.description.unwrap_or_default(),
            });
        }

        api_response.result.ok_or_else(|| TelegramError::Api {
            code: -1,
            description: "No result in response".to_string(),
        })
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_response() {
        let body = r#"{"ok":false,"error_code":403,"description":"Forbidden: bot was blocked by the user"}"#;
        let parsed: ApiResponse<Message> = serde_json::from_str(body).unwrap();
        assert!(!parsed.ok);
        assert_eq!(parsed.error_code, Some(403));
        assert!(parsed.result.is_none());
    }

    #[test]
    fn test_parse_updates_response() {
        let body = r#"{"ok":true,"result":[{"update_id":10,"message":{"message_id":1,"date":1700000000,
            "chat":{"id":42,"type":"private"},"from":{"id":42,"is_bot":false,"first_name":"A","language_code":"en"},
            "text":"/start"}}]}"#;
        let parsed: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        let updates = parsed.result.unwrap();
        assert_eq!(updates[0].update_id, 10);
        let message = updates[0].message.as_ref().unwrap();
        assert!(message.is_private());
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert_eq!(
            message.from.as_ref().unwrap().language_code.as_deref(),
            Some("en")
        );
    }

    #[tokio::test]
    async fn test_health_monitor_stops_when_aborted() {
        let client = TelegramClient::new(TelegramConfig::new("123:abc")).unwrap();
        let monitor = client.start_health_monitor(Duration::from_secs(3600));

        monitor.abort();
        let joined = monitor.await;
        assert!(joined.unwrap_err().is_cancelled());
        assert!(!client.is_connected());
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            TelegramClient::new(TelegramConfig::new("")),
            Err(TelegramError::Config(_))
        ));
    }
}
