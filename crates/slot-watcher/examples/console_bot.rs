//! Walk through the funnel from the terminal against a scripted feed.
//!
//! Run with: cargo run -p slot-watcher --example console_bot
//!
//! Try: `Moscow`, `Коледино (ID: 507)`, `Boxes`, `1`, `2025-01-01`, `2025-01-10`.

use std::sync::Arc;
use std::time::Duration;

use mock_supply::{FeedResponse, ScriptedSupplies};
use slot_watcher::{SlotWatcher, WatcherConfig};
use supply_core::{
    async_trait, AcceptanceCoefficient, InboundMessage, MessageSender, OutboundMessage, SendError,
    UserId, Warehouse,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

struct ConsoleSender;

#[async_trait]
impl MessageSender for ConsoleSender {
    async fn send(&self, message: &OutboundMessage) -> Result<(), SendError> {
        println!("bot> {}", message.text);
        for choice in &message.choices {
            println!("     [{}]", choice);
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let supplies = Arc::new(ScriptedSupplies::new(vec![
        Warehouse::new(507, "Коледино", "Moscow region, Podolsk"),
        Warehouse::new(120762, "Электросталь", "Moscow region, Elektrostal"),
        Warehouse::new(117986, "Казань", "Kazan"),
    ]));
    supplies.push_feed(FeedResponse::Rows(Vec::new())).await;
    supplies
        .push_feed(FeedResponse::Rows(vec![AcceptanceCoefficient::new(
            "2025-01-05T10:00:00Z",
            "Короба",
            1.0,
        )]))
        .await;

    let config = WatcherConfig {
        poll_interval: Duration::from_secs(5),
        ..WatcherConfig::default()
    };
    let watcher = SlotWatcher::new(config, supplies, Arc::new(ConsoleSender));

    let user = UserId(1);
    watcher
        .handle_message(&InboundMessage::new(user, "/start", 0).with_language("en"))
        .await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        watcher.handle_message(&InboundMessage::new(user, line, 0)).await;
    }

    watcher.shutdown().await;
}
