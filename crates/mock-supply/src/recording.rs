//! Sender that records what it delivers.

use std::time::Duration;

use supply_core::{async_trait, MessageSender, OutboundMessage, SendError, UserId};
use tokio::sync::{Mutex, Notify};
use tokio::time::{timeout_at, Instant};

/// Records every message instead of delivering it.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<OutboundMessage>>,
    notify: Notify,
    fail: bool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every send fails. Nothing is recorded.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Texts sent to `user`, in order.
    pub async fn texts_for(&self, user: UserId) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.recipient == user)
            .map(|m| m.text.clone())
            .collect()
    }

    pub async fn last_for(&self, user: UserId) -> Option<OutboundMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|m| m.recipient == user)
            .cloned()
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }

    /// Wait until at least `count` messages were recorded.
    ///
    /// Returns `false` if `limit` elapses first.
    pub async fn wait_for(&self, count: usize, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        loop {
            let notified = self.notify.notified();
            if self.sent.lock().await.len() >= count {
                return true;
            }
            if timeout_at(deadline, notified).await.is_err() {
                return false;
            }
        }
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, message: &OutboundMessage) -> Result<(), SendError> {
        if self.fail {
            return Err(SendError::Failed("recording sender set to fail".to_string()));
        }
        self.sent.lock().await.push(message.clone());
        self.notify.notify_waiters();
        Ok(())
    }
}
