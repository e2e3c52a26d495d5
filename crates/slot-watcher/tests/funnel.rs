//! Conversation funnel tests against scripted collaborators.

use std::sync::Arc;
use std::time::Duration;

use mock_supply::{FeedResponse, RecordingSender, ScriptedSupplies};
use slot_watcher::{translate, Language, SlotWatcher, Stage, TextKey, WatcherConfig};
use supply_core::{AcceptanceCoefficient, InboundMessage, PackageType, UserId, Warehouse};

const USER: UserId = UserId(1001);

fn warehouses() -> Vec<Warehouse> {
    vec![
        Warehouse::new(507, "Коледино", "Moscow region, Podolsk"),
        Warehouse::new(686, "Новосибирск", "Novosibirsk"),
        Warehouse::new(120762, "Электросталь", "Moscow region, Elektrostal"),
    ]
}

struct Harness {
    watcher: SlotWatcher,
    supplies: Arc<ScriptedSupplies>,
    sender: Arc<RecordingSender>,
}

impl Harness {
    fn new() -> Self {
        let supplies = Arc::new(ScriptedSupplies::new(warehouses()));
        let sender = Arc::new(RecordingSender::new());
        let watcher = SlotWatcher::new(WatcherConfig::default(), supplies.clone(), sender.clone());
        Self {
            watcher,
            supplies,
            sender,
        }
    }

    async fn say(&self, text: &str) -> Vec<String> {
        let message = InboundMessage::new(USER, text, 0).with_language("en-US");
        self.watcher
            .handle_message(&message)
            .await
            .into_iter()
            .map(|m| m.text)
            .collect()
    }

    async fn stage(&self) -> Option<Stage> {
        self.watcher.states().get(USER).await.map(|s| s.stage())
    }
}

fn en(key: TextKey) -> String {
    translate(Language::En, key).to_string()
}

#[tokio::test(start_paused = true)]
async fn test_moscow_end_to_end() {
    let h = Harness::new();
    h.supplies.push_feed(FeedResponse::Rows(Vec::new())).await;
    h.supplies
        .push_feed(FeedResponse::Rows(vec![
            AcceptanceCoefficient::new("2025-01-05T10:00:00Z", "Monopallets", 1.0),
            AcceptanceCoefficient::new("2025-01-05T10:00:00Z", "Boxes", 1.0),
        ]))
        .await;

    assert_eq!(h.say("/start").await, vec![en(TextKey::Welcome)]);

    let replies = h.watcher.handle_message(&InboundMessage::new(USER, "Moscow", 0)).await;
    assert_eq!(replies.len(), 1);
    assert_eq!(
        replies[0].choices,
        vec!["Коледино (ID: 507)", "Электросталь (ID: 120762)"]
    );

    let replies = h
        .watcher
        .handle_message(&InboundMessage::new(USER, "Коледино (ID: 507)", 0))
        .await;
    assert_eq!(
        replies[0].choices,
        vec!["Boxes", "Mono-pallets", "Supersafe", "QR-supply-with-boxes"]
    );

    assert_eq!(h.say("Boxes").await, vec![en(TextKey::EnterCoefficient)]);
    assert_eq!(h.say("1").await, vec![en(TextKey::EnterStartDate)]);
    assert_eq!(h.say("2025-01-01").await, vec![en(TextKey::EnterEndDate)]);
    assert_eq!(h.say("2025-01-10").await, vec![en(TextKey::WatchStarted)]);

    assert_eq!(h.watcher.active_watches().await, vec![USER]);
    assert_eq!(h.stage().await, Some(Stage::Complete));

    // First poll is empty, the second one (a minute later) matches.
    assert!(h.sender.wait_for(8, Duration::from_secs(180)).await);
    tokio::time::sleep(Duration::from_millis(10)).await;

    let texts = h.sender.texts_for(USER).await;
    let notification = texts.last().unwrap();
    assert!(notification.starts_with(&en(TextKey::MatchFound)));
    assert!(notification.contains("2025-01-05"));
    assert!(notification.contains("Коледино"));
    assert!(notification.contains("Boxes"));

    assert_eq!(h.supplies.coefficient_fetches(), 2);
    assert_eq!(h.supplies.requested_warehouses().await, vec![507, 507]);
    assert!(h.watcher.active_watches().await.is_empty());
    assert_eq!(h.stage().await, None);
    assert_eq!(h.watcher.count_users().await, 0);

    // A later message starts a fresh conversation.
    assert_eq!(h.say("hello").await, vec![en(TextKey::Welcome)]);
    assert_eq!(h.stage().await, Some(Stage::City));
}

#[tokio::test]
async fn test_first_contact_without_start_gets_welcome() {
    let h = Harness::new();
    assert_eq!(h.say("Moscow").await, vec![en(TextKey::Welcome)]);
    assert_eq!(h.stage().await, Some(Stage::City));
}

#[tokio::test]
async fn test_language_is_negotiated_from_client() {
    let h = Harness::new();
    let ru = InboundMessage::new(UserId(7), "/start", 0).with_language("ru");
    let replies = h.watcher.handle_message(&ru).await;
    assert_eq!(replies[0].text, translate(Language::Ru, TextKey::Welcome));

    let unknown = InboundMessage::new(UserId(8), "/start", 0).with_language("de");
    let replies = h.watcher.handle_message(&unknown).await;
    assert_eq!(replies[0].text, translate(Language::Ru, TextKey::Welcome));
}

#[tokio::test]
async fn test_unknown_city_reprompts_without_state_change() {
    let h = Harness::new();
    h.say("/start").await;

    assert_eq!(h.say("Vladivostok").await, vec![en(TextKey::NoWarehousesFound)]);
    assert_eq!(h.stage().await, Some(Stage::City));

    // City matching is case-insensitive on the address.
    let replies = h.watcher.handle_message(&InboundMessage::new(USER, "novosibirsk", 0)).await;
    assert_eq!(replies[0].choices, vec!["Новосибирск (ID: 686)"]);
    assert_eq!(h.stage().await, Some(Stage::Warehouse));
}

#[tokio::test]
async fn test_directory_outage_reads_as_no_warehouses() {
    let h = Harness::new();
    h.supplies.fail_warehouses("503 Service Unavailable").await;
    h.say("/start").await;

    assert_eq!(h.say("Moscow").await, vec![en(TextKey::NoWarehousesFound)]);
    assert_eq!(h.stage().await, Some(Stage::City));
}

#[tokio::test]
async fn test_invalid_inputs_reprompt_and_keep_state() {
    let h = Harness::new();
    h.say("/start").await;
    h.say("Novosibirsk").await;

    assert_eq!(h.say("Новосибирск").await, vec![en(TextKey::WarehouseNotInList)]);
    assert_eq!(h.stage().await, Some(Stage::Warehouse));
    h.say("Новосибирск (ID: 686)").await;

    assert_eq!(h.say("Pallets").await, vec![en(TextKey::PackageTypeNotInList)]);
    h.say("Supersafe").await;

    assert_eq!(h.say("one").await, vec![en(TextKey::CoefficientNotNumber)]);
    assert_eq!(h.stage().await, Some(Stage::Coefficient));
    h.say("-1").await;

    assert_eq!(h.say("10.01.2025").await, vec![en(TextKey::InvalidDate)]);
    h.say("2025-01-10").await;

    assert_eq!(h.say("2025-01-09").await, vec![en(TextKey::EndBeforeStart)]);
    let state = h.watcher.states().get(USER).await.unwrap();
    assert_eq!(state.stage(), Stage::EndDate);
    assert_eq!(state.end_date(), None);
    assert_eq!(state.coefficient(), Some(-1.0));
    assert_eq!(state.package_type(), Some(PackageType::Supersafe));
    assert!(h.watcher.active_watches().await.is_empty());

    assert_eq!(h.say("2025-01-10").await, vec![en(TextKey::WatchStarted)]);
    assert_eq!(h.watcher.active_watches().await, vec![USER]);
    h.watcher.shutdown().await;
}

#[tokio::test]
async fn test_completed_conversation_answers_unknown_message() {
    let h = Harness::new();
    for text in ["/start", "Novosibirsk", "Новосибирск (ID: 686)", "Boxes", "0", "2025-01-01", "2025-01-02"] {
        h.say(text).await;
    }

    assert_eq!(h.say("anything").await, vec![en(TextKey::UnknownMessage)]);
    assert_eq!(h.say("2025-01-03").await, vec![en(TextKey::UnknownMessage)]);
    assert_eq!(h.watcher.active_watches().await, vec![USER]);
    h.watcher.shutdown().await;
}

#[tokio::test]
async fn test_choice_prompts_carry_keyboards_and_others_do_not() {
    let h = Harness::new();
    let start = h.watcher.handle_message(&InboundMessage::new(USER, "/start", 0)).await;
    assert!(!start[0].has_choices());

    h.say("Novosibirsk").await;
    let last = h.sender.last_for(USER).await.unwrap();
    assert!(last.has_choices());

    h.say("Новосибирск (ID: 686)").await;
    h.say("Boxes").await;
    let last = h.sender.last_for(USER).await.unwrap();
    assert_eq!(last.text, en(TextKey::EnterCoefficient));
    assert!(!last.has_choices());
}
