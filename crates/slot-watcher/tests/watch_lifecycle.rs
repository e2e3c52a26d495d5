//! Watch lifecycle: restarts, failures, admin operations and isolation
//! between users.

use std::sync::Arc;
use std::time::Duration;

use mock_supply::{DelayedSupplies, FeedResponse, RecordingSender, ScriptedSupplies};
use slot_watcher::{translate, AdminCommand, Language, SlotWatcher, Stage, TextKey, WatcherConfig};
use supply_core::{
    async_trait, AcceptanceCoefficient, InboundMessage, MessageSender, OutboundMessage, SendError,
    UserId, Warehouse,
};
use tokio::sync::Notify;

fn warehouses() -> Vec<Warehouse> {
    vec![
        Warehouse::new(507, "Коледино", "Moscow region"),
        Warehouse::new(686, "Новосибирск", "Novosibirsk"),
    ]
}

async fn complete_funnel(watcher: &SlotWatcher, user: UserId, coefficient: &str) {
    for text in [
        "/start",
        "Moscow",
        "Коледино (ID: 507)",
        "Короба",
        coefficient,
        "2025-01-01",
        "2025-01-31",
    ] {
        watcher.handle_message(&InboundMessage::new(user, text, 0)).await;
    }
}

fn ru(key: TextKey) -> String {
    translate(Language::Ru, key).to_string()
}

#[tokio::test(start_paused = true)]
async fn test_fetch_failure_notifies_once_and_ends_conversation() {
    let supplies = Arc::new(ScriptedSupplies::new(warehouses()));
    supplies.push_feed(FeedResponse::Fail("502 Bad Gateway".to_string())).await;
    let sender = Arc::new(RecordingSender::new());
    let watcher = SlotWatcher::new(WatcherConfig::default(), supplies.clone(), sender.clone());
    let user = UserId(1);

    complete_funnel(&watcher, user, "1").await;
    assert!(sender.wait_for(8, Duration::from_secs(5)).await);
    tokio::time::sleep(Duration::from_secs(600)).await;

    let texts = sender.texts_for(user).await;
    assert_eq!(texts.iter().filter(|t| **t == ru(TextKey::CheckFailed)).count(), 1);
    assert_eq!(supplies.coefficient_fetches(), 1);
    assert!(watcher.active_watches().await.is_empty());
    assert!(watcher.states().get(user).await.is_none());

    // The next message opens a fresh conversation.
    let replies = watcher.handle_message(&InboundMessage::new(user, "Moscow", 0)).await;
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].text, ru(TextKey::Welcome));
    assert_eq!(
        watcher.states().get(user).await.map(|s| s.stage()),
        Some(Stage::City)
    );
}

#[tokio::test(start_paused = true)]
async fn test_restart_cancels_running_watch() {
    let supplies = Arc::new(ScriptedSupplies::new(warehouses()));
    let sender = Arc::new(RecordingSender::new());
    let watcher = SlotWatcher::new(WatcherConfig::default(), supplies.clone(), sender.clone());
    let user = UserId(2);

    complete_funnel(&watcher, user, "0").await;
    assert_eq!(watcher.active_watches().await, vec![user]);

    watcher.handle_message(&InboundMessage::new(user, "/start", 0)).await;
    assert!(watcher.active_watches().await.is_empty());
    assert_eq!(
        watcher.states().get(user).await.map(|s| s.stage()),
        Some(Stage::City)
    );

    let fetches = supplies.coefficient_fetches();
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(supplies.coefficient_fetches(), fetches);
}

#[tokio::test(start_paused = true)]
async fn test_restart_cancels_watch_with_fetch_in_flight() {
    let scripted = Arc::new(ScriptedSupplies::new(warehouses()));
    let supplies = Arc::new(DelayedSupplies::with_secs(scripted.clone(), 30));
    let sender = Arc::new(RecordingSender::new());
    let watcher = SlotWatcher::new(WatcherConfig::default(), supplies, sender.clone());
    let user = UserId(3);

    complete_funnel(&watcher, user, "1").await;
    scripted
        .push_feed(FeedResponse::Rows(vec![AcceptanceCoefficient::new(
            "2025-01-05T10:00:00Z",
            "Короба",
            1.0,
        )]))
        .await;

    // The first fetch is still sleeping inside the provider.
    tokio::time::sleep(Duration::from_secs(10)).await;
    watcher.handle_message(&InboundMessage::new(user, "/start", 0)).await;
    tokio::time::sleep(Duration::from_secs(120)).await;

    let texts = sender.texts_for(user).await;
    assert!(!texts.iter().any(|t| t.starts_with(&ru(TextKey::MatchFound))));
    assert_eq!(scripted.coefficient_fetches(), 0);
}

/// Holds back the match notification until released, so a test can act
/// while the poller is between finding a slot and ending its conversation.
struct GatedSender {
    inner: RecordingSender,
    held: Notify,
    release: Notify,
}

impl GatedSender {
    fn new() -> Self {
        Self {
            inner: RecordingSender::new(),
            held: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl MessageSender for GatedSender {
    async fn send(&self, message: &OutboundMessage) -> Result<(), SendError> {
        if message.text.starts_with(&ru(TextKey::MatchFound)) {
            self.held.notify_one();
            self.release.notified().await;
        }
        self.inner.send(message).await
    }
}

#[tokio::test(start_paused = true)]
async fn test_match_does_not_delete_a_newer_conversation() {
    let scripted = Arc::new(ScriptedSupplies::new(warehouses()));
    scripted
        .push_feed(FeedResponse::Rows(vec![AcceptanceCoefficient::new(
            "2025-01-05T10:00:00Z",
            "Короба",
            1.0,
        )]))
        .await;
    let sender = Arc::new(GatedSender::new());
    let watcher = SlotWatcher::new(WatcherConfig::default(), scripted.clone(), sender.clone());
    let user = UserId(4);

    complete_funnel(&watcher, user, "1").await;
    sender.held.notified().await;

    // The poller has matched and is stuck delivering the notification.
    watcher.handle_message(&InboundMessage::new(user, "/start", 0)).await;
    watcher.handle_message(&InboundMessage::new(user, "Moscow", 0)).await;
    assert_eq!(
        watcher.states().get(user).await.map(|s| s.stage()),
        Some(Stage::Warehouse)
    );

    sender.release.notify_one();
    tokio::time::sleep(Duration::from_secs(1)).await;

    let texts = sender.inner.texts_for(user).await;
    assert!(texts.last().unwrap().starts_with(&ru(TextKey::MatchFound)));
    assert!(watcher.active_watches().await.is_empty());
    assert_eq!(
        watcher.states().get(user).await.map(|s| s.stage()),
        Some(Stage::Warehouse)
    );
}

#[tokio::test(start_paused = true)]
async fn test_exact_coefficient_match_only() {
    let scripted = Arc::new(ScriptedSupplies::new(warehouses()));
    scripted
        .push_feed(FeedResponse::Rows(vec![AcceptanceCoefficient::new(
            "2025-01-05T10:00:00Z",
            "Короба",
            1.0000001,
        )]))
        .await;
    let sender = Arc::new(RecordingSender::new());
    let watcher = SlotWatcher::new(WatcherConfig::default(), scripted.clone(), sender.clone());
    let user = UserId(5);

    complete_funnel(&watcher, user, "1").await;
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(scripted.coefficient_fetches(), 1);
    assert_eq!(watcher.active_watches().await, vec![user]);
    watcher.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_one_users_failure_does_not_affect_another() {
    let scripted = Arc::new(ScriptedSupplies::new(warehouses()));
    let sender = Arc::new(RecordingSender::new());
    let watcher = SlotWatcher::new(WatcherConfig::default(), scripted.clone(), sender.clone());

    complete_funnel(&watcher, UserId(10), "1").await;
    // Let the first watch take its first (empty) poll before scripting the
    // failure for the second one.
    tokio::time::sleep(Duration::from_secs(1)).await;
    scripted.push_feed(FeedResponse::Fail("timeout".to_string())).await;
    complete_funnel(&watcher, UserId(11), "2").await;

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(watcher.active_watches().await, vec![UserId(10)]);
    assert_eq!(
        sender.last_for(UserId(11)).await.unwrap().text,
        ru(TextKey::CheckFailed)
    );
    watcher.shutdown().await;
}

#[tokio::test]
async fn test_admin_operations() {
    let scripted = Arc::new(ScriptedSupplies::new(warehouses()));
    let sender = Arc::new(RecordingSender::new());
    let watcher = SlotWatcher::new(WatcherConfig::default(), scripted.clone(), sender.clone());
    let admin = InboundMessage::new(UserId(99), "/admin", 0).with_language("en");

    complete_funnel(&watcher, UserId(20), "1").await;
    watcher.handle_message(&InboundMessage::new(UserId(21), "/start", 0)).await;

    let panel = watcher.handle_admin(&admin, AdminCommand::Panel).await;
    assert_eq!(panel.choices, vec!["Active watches", "Clear cache", "Statistics"]);

    let report = watcher.handle_admin(&admin, AdminCommand::ActiveWatches).await;
    assert!(report.text.starts_with("Active watches:"));
    assert!(report.text.contains("20: Коледино (ID: 507)"));

    let stats = watcher.handle_admin(&admin, AdminCommand::Statistics).await;
    assert_eq!(
        stats.text,
        "Total users: 2\nWarehouses in cache: 2\nRunning watches: 1"
    );

    watcher.handle_admin(&admin, AdminCommand::ClearCache).await;
    assert_eq!(watcher.count_cached_warehouses().await, 0);
    assert_eq!(scripted.warehouse_fetches(), 1);

    let denied = watcher.deny_admin(&InboundMessage::new(UserId(21), "/admin", 0)).await;
    assert_eq!(denied.text, ru(TextKey::NoPermission));
    assert_eq!(sender.last_for(UserId(99)).await.unwrap().recipient, UserId(99));

    watcher.shutdown().await;
    assert!(watcher.active_watches().await.is_empty());
}
