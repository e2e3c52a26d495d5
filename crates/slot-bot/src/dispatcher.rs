//! Per-user dispatch of incoming updates.
//!
//! Each user with recent traffic gets a worker task fed by a bounded queue,
//! so one user's messages are handled strictly in order while different
//! users proceed in parallel. A worker exits after an idle period; the next
//! message for that user starts a new one.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use slot_watcher::{AdminCommand, SlotWatcher};
use supply_core::{InboundMessage, UserId};
use telegram_client::{TelegramError, Update};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::config::{BotConfig, BotError};
use crate::inbound::UpdateExt;

/// How long shutdown waits for workers to finish queued messages.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

struct Worker {
    queue: mpsc::Sender<InboundMessage>,
    task: JoinHandle<()>,
}

/// Feeds updates to per-user workers.
pub struct Dispatcher {
    watcher: Arc<SlotWatcher>,
    config: BotConfig,
    workers: HashMap<UserId, Worker>,
}

impl Dispatcher {
    pub fn new(watcher: Arc<SlotWatcher>, config: BotConfig) -> Self {
        Self {
            watcher,
            config,
            workers: HashMap::new(),
        }
    }

    /// Number of live workers.
    pub fn worker_count(&self) -> usize {
        self.workers.values().filter(|w| !w.queue.is_closed()).count()
    }

    /// Queue a message for its sender's worker, starting one if needed.
    pub fn dispatch(&mut self, message: InboundMessage) {
        let user = message.sender;
        self.workers.retain(|_, w| !w.queue.is_closed());

        let message = match self.workers.get(&user) {
            Some(worker) => match worker.queue.try_send(message) {
                Ok(()) => return,
                Err(TrySendError::Full(_)) => {
                    warn!("Queue for user {} is full, dropping message", user);
                    return;
                }
                // The worker retired between the check and the send.
                Err(TrySendError::Closed(message)) => message,
            },
            None => message,
        };

        let worker = self.spawn_worker(user);
        if let Err(e) = worker.queue.try_send(message) {
            error!("Failed to queue message for new worker of user {}: {}", user, e);
        }
        self.workers.insert(user, worker);
    }

    fn spawn_worker(&self, user: UserId) -> Worker {
        let (queue, inbox) = mpsc::channel(self.config.queue_capacity.max(1));
        let watcher = Arc::clone(&self.watcher);
        let config = self.config.clone();
        debug!("Starting worker for user {}", user);
        let task = tokio::spawn(run_worker(user, watcher, config, inbox));
        Worker { queue, task }
    }

    /// Dispatch updates until the stream ends.
    pub async fn run<S>(self, updates: S) -> Result<(), BotError>
    where
        S: Stream<Item = Result<Update, TelegramError>> + Unpin,
    {
        self.run_with_shutdown(updates, std::future::pending()).await
    }

    /// Dispatch updates until `shutdown_signal` completes or the stream ends.
    ///
    /// On shutdown, workers finish their queued messages, then every watch is
    /// stopped.
    pub async fn run_with_shutdown<S, F>(mut self, mut updates: S, shutdown_signal: F) -> Result<(), BotError>
    where
        S: Stream<Item = Result<Update, TelegramError>> + Unpin,
        F: Future<Output = ()>,
    {
        info!("Starting update dispatcher (graceful shutdown enabled)");
        tokio::pin!(shutdown_signal);

        let result = loop {
            tokio::select! {
                biased;

                () = &mut shutdown_signal => {
                    info!("Shutdown signal received, stopping dispatcher");
                    break Ok(());
                }

                next = updates.next() => match next {
                    Some(Ok(update)) => match update.to_inbound_message() {
                        Some(message) => self.dispatch(message),
                        None => debug!("Skipping update {}", update.update_id),
                    },
                    Some(Err(e)) => {
                        // The stream backs off and retries on its own.
                        error!("Update stream error: {}", e);
                    }
                    None => {
                        warn!("Update stream ended");
                        break Err(BotError::StreamEnded);
                    }
                },
            }
        };

        self.shutdown().await;
        result
    }

    async fn shutdown(&mut self) {
        let workers: Vec<Worker> = self.workers.drain().map(|(_, w)| w).collect();
        info!("Waiting for {} workers", workers.len());
        for Worker { queue, task } in workers {
            drop(queue);
            if timeout(SHUTDOWN_GRACE, task).await.is_err() {
                warn!("Worker did not finish within {:?}", SHUTDOWN_GRACE);
            }
        }
        self.watcher.shutdown().await;
    }
}

async fn run_worker(
    user: UserId,
    watcher: Arc<SlotWatcher>,
    config: BotConfig,
    mut inbox: mpsc::Receiver<InboundMessage>,
) {
    loop {
        match timeout(config.worker_idle, inbox.recv()).await {
            Ok(Some(message)) => route(&watcher, &config, &message).await,
            Ok(None) => break,
            Err(_) => {
                // Refuse new messages, then finish whatever slipped in.
                inbox.close();
                while let Ok(message) = inbox.try_recv() {
                    route(&watcher, &config, &message).await;
                }
                break;
            }
        }
    }
    debug!("Worker for user {} retired", user);
}

/// Send a message to the admin panel or the conversation funnel.
pub async fn route(watcher: &SlotWatcher, config: &BotConfig, message: &InboundMessage) {
    info!("Message from {}: {}", message.sender, message.text);
    match AdminCommand::parse(message) {
        Some(command) if config.is_admin(message.sender) => {
            watcher.handle_admin(message, command).await;
        }
        Some(AdminCommand::Panel) => {
            watcher.deny_admin(message).await;
        }
        _ => {
            watcher.handle_message(message).await;
        }
    }
}
