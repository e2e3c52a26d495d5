//! One polling task per user.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use supply_core::UserId;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::ScheduleError;
use crate::poller::{ConditionPoller, PollOutcome};
use crate::state::WatchSnapshot;

struct WatchHandle {
    id: u64,
    snapshot: Arc<WatchSnapshot>,
    cancel: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

struct SchedulerInner {
    poller: ConditionPoller,
    watches: Mutex<HashMap<UserId, WatchHandle>>,
    next_id: AtomicU64,
}

/// Starts, tracks and stops watches. At most one watch runs per user.
///
/// Cloning is cheap; clones share the same handle table.
#[derive(Clone)]
pub struct WatchScheduler {
    inner: Arc<SchedulerInner>,
}

impl WatchScheduler {
    pub fn new(poller: ConditionPoller) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                poller,
                watches: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Spawn a watch for `snapshot.user`.
    ///
    /// The task is spawned and registered under the table lock, so it cannot
    /// deregister itself before it is registered.
    pub async fn start(&self, snapshot: WatchSnapshot) -> Result<(), ScheduleError> {
        let user = snapshot.user;
        let mut watches = self.inner.watches.lock().await;

        if watches.contains_key(&user) {
            warn!("User {} already has an active watch, ignoring new one", user);
            return Err(ScheduleError::AlreadyActive(user));
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let snapshot = Arc::new(snapshot);
        let (cancel, cancel_rx) = oneshot::channel();

        let scheduler = self.clone();
        let watch = Arc::clone(&snapshot);
        let task = tokio::spawn(async move {
            let outcome = scheduler.inner.poller.run(&watch, cancel_rx).await;
            scheduler.finish(watch.user, id, outcome).await;
        });

        watches.insert(
            user,
            WatchHandle {
                id,
                snapshot,
                cancel,
                task,
            },
        );
        info!("Started watch {} for user {}", id, user);
        Ok(())
    }

    /// Cancel the user's watch. Returns whether one was running.
    pub async fn stop(&self, user: UserId) -> bool {
        let Some(handle) = self.inner.watches.lock().await.remove(&user) else {
            return false;
        };
        // The poller may already be done; a closed channel is fine.
        let _ = handle.cancel.send(());
        info!("Stopped watch {} for user {}", handle.id, user);
        true
    }

    /// Users with a running watch, in ascending order.
    pub async fn list(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.inner.watches.lock().await.keys().copied().collect();
        users.sort();
        users
    }

    /// Parameters of every running watch, ordered by user.
    pub async fn snapshots(&self) -> Vec<Arc<WatchSnapshot>> {
        let mut snapshots: Vec<Arc<WatchSnapshot>> = self
            .inner
            .watches
            .lock()
            .await
            .values()
            .map(|h| Arc::clone(&h.snapshot))
            .collect();
        snapshots.sort_by_key(|s| s.user);
        snapshots
    }

    pub async fn is_active(&self, user: UserId) -> bool {
        self.inner.watches.lock().await.contains_key(&user)
    }

    pub async fn len(&self) -> usize {
        self.inner.watches.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Cancel every watch and wait for the tasks to exit.
    pub async fn shutdown(&self) {
        let handles: Vec<WatchHandle> = self
            .inner
            .watches
            .lock()
            .await
            .drain()
            .map(|(_, handle)| handle)
            .collect();

        if handles.is_empty() {
            return;
        }
        info!("Stopping {} active watches", handles.len());

        let mut tasks = Vec::with_capacity(handles.len());
        for handle in handles {
            let _ = handle.cancel.send(());
            tasks.push(handle.task);
        }
        for task in tasks {
            if let Err(e) = task.await {
                warn!("Watch task ended abnormally: {}", e);
            }
        }
    }

    /// Deregister a finished watch unless it was already replaced or stopped.
    async fn finish(&self, user: UserId, id: u64, outcome: PollOutcome) {
        {
            let mut watches = self.inner.watches.lock().await;
            if watches.get(&user).is_some_and(|h| h.id == id) {
                watches.remove(&user);
            }
        }

        match outcome {
            PollOutcome::Matched(hit) => {
                info!("Watch {} for user {} matched slot on {}", id, user, hit.date)
            }
            PollOutcome::Failed(e) => warn!("Watch {} for user {} failed: {}", id, user, e),
            PollOutcome::Cancelled => info!("Watch {} for user {} cancelled", id, user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::state::StateStore;
    use chrono::NaiveDate;
    use mock_supply::{FeedResponse, RecordingSender, ScriptedSupplies};
    use std::time::Duration;
    use supply_core::{AcceptanceCoefficient, PackageType};

    fn snapshot(user: i64) -> WatchSnapshot {
        WatchSnapshot {
            user: UserId(user),
            session: 1,
            language: Language::Ru,
            warehouse_id: 507,
            warehouse_name: "Коледино".to_string(),
            package_type: PackageType::Boxes,
            coefficient: 1.0,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        }
    }

    fn scheduler(provider: Arc<ScriptedSupplies>, sender: Arc<RecordingSender>) -> WatchScheduler {
        let poller = ConditionPoller::new(
            provider,
            sender,
            Arc::new(StateStore::new()),
            Duration::from_secs(60),
        );
        WatchScheduler::new(poller)
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_watch_for_same_user_is_rejected() {
        let provider = Arc::new(ScriptedSupplies::new(Vec::new()));
        let scheduler = scheduler(provider, Arc::new(RecordingSender::new()));

        scheduler.start(snapshot(1)).await.unwrap();
        assert_eq!(
            scheduler.start(snapshot(1)).await,
            Err(ScheduleError::AlreadyActive(UserId(1)))
        );
        scheduler.start(snapshot(2)).await.unwrap();

        assert_eq!(scheduler.list().await, vec![UserId(1), UserId(2)]);
        scheduler.shutdown().await;
        assert!(scheduler.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_without_notification() {
        let provider = Arc::new(ScriptedSupplies::new(Vec::new()));
        let sender = Arc::new(RecordingSender::new());
        let scheduler = scheduler(provider, sender.clone());

        scheduler.start(snapshot(1)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert!(scheduler.stop(UserId(1)).await);
        assert!(!scheduler.stop(UserId(1)).await);
        assert!(!scheduler.is_active(UserId(1)).await);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert!(sender.messages().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_watch_deregisters_itself() {
        let provider = Arc::new(ScriptedSupplies::new(Vec::new()));
        provider
            .push_feed(FeedResponse::Rows(vec![AcceptanceCoefficient::new(
                "2025-01-06T00:00:00Z",
                "Короба",
                1.0,
            )]))
            .await;
        let sender = Arc::new(RecordingSender::new());
        let scheduler = scheduler(provider, sender.clone());

        scheduler.start(snapshot(1)).await.unwrap();
        sender.wait_for(1, Duration::from_secs(5)).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(!scheduler.is_active(UserId(1)).await);
        scheduler.start(snapshot(1)).await.unwrap();
        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_watches_for_many_users_run_independently() {
        let provider = Arc::new(ScriptedSupplies::new(Vec::new()));
        provider.push_feed(FeedResponse::Fail("boom".to_string())).await;
        let sender = Arc::new(RecordingSender::new());
        let scheduler = scheduler(provider, sender.clone());

        for user in 1..=5 {
            scheduler.start(snapshot(user)).await.unwrap();
        }
        sender.wait_for(1, Duration::from_secs(5)).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Exactly one watch consumed the failure; the rest keep polling.
        assert_eq!(sender.messages().await.len(), 1);
        assert_eq!(scheduler.len().await, 4);
        scheduler.shutdown().await;
    }
}
