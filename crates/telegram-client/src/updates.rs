//! Long-polling update stream.

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use futures::stream::{self, Stream};
use tracing::{debug, info, warn};

use crate::client::TelegramClient;
use crate::error::TelegramError;
use crate::types::Update;

/// Configuration for retrying failed `getUpdates` calls.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Maximum number of consecutive retries (None = infinite).
    pub max_retries: Option<u32>,
    /// Initial delay before first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Backoff multiplier for each retry.
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: None,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl ReconnectConfig {
    /// Calculate delay for a given attempt number.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }

    /// Check if we should retry after the given number of attempts.
    pub fn should_retry(&self, attempts: u32) -> bool {
        self.max_retries.map_or(true, |max| attempts < max)
    }
}

/// A stream of incoming updates.
pub type UpdateStream = Pin<Box<dyn Stream<Item = Result<Update, TelegramError>> + Send>>;

struct PollState {
    client: TelegramClient,
    offset: Option<i64>,
    pending: VecDeque<Update>,
    failures: u32,
    reconnect: ReconnectConfig,
}

/// Create an update stream with default retry configuration.
pub fn subscribe(client: &TelegramClient) -> UpdateStream {
    subscribe_with_reconnect(client, ReconnectConfig::default())
}

/// Create an update stream with custom retry configuration.
///
/// Each failed poll yields one `Err` item and then backs off. The stream
/// ends once `max_retries` consecutive failures have occurred.
pub fn subscribe_with_reconnect(
    client: &TelegramClient,
    reconnect: ReconnectConfig,
) -> UpdateStream {
    info!("Starting getUpdates long polling");

    let state = PollState {
        client: client.clone(),
        offset: None,
        pending: VecDeque::new(),
        failures: 0,
        reconnect,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(update) = state.pending.pop_front() {
                return Some((Ok(update), state));
            }

            if !state.reconnect.should_retry(state.failures) {
                warn!("Giving up after {} failed polls", state.failures);
                return None;
            }

            match state.client.get_updates(state.offset).await {
                Ok(updates) => {
                    if state.failures > 0 {
                        info!("Update polling recovered");
                    }
                    state.failures = 0;
                    debug!("Received {} updates", updates.len());
                    for update in updates {
                        state.offset = Some(update.update_id + 1);
                        state.pending.push_back(update);
                    }
                }
                Err(e) => {
                    let delay = state.reconnect.delay_for_attempt(state.failures);
                    state.failures += 1;
                    warn!("getUpdates failed: {} (retrying in {:?})", e, delay);
                    tokio::time::sleep(delay).await;
                    return Some((Err(e), state));
                }
            }
        }
    }))
}
