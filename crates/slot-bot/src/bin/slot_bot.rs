//! Supply slot watch bot.
//!
//! Required env vars: `TELEGRAM_BOT_TOKEN`, `WB_API_KEY`.
//! See the crate configs for the optional ones.

use std::sync::Arc;
use std::time::Duration;

use slot_bot::{BotConfig, Dispatcher, TelegramSender};
use slot_watcher::{SlotWatcher, WatcherConfig};
use supplies_api::SuppliesClient;
use telegram_client::{subscribe, TelegramClient, TelegramConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Interval between Bot API health checks.
const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let bot_config = BotConfig::from_env()?;
    let watcher_config = WatcherConfig::from_env()?;
    let supplies = SuppliesClient::from_env()?;

    let telegram_config = TelegramConfig::from_env()?;
    info!("Connecting to Bot API at {}", telegram_config.api_url);
    let telegram = TelegramClient::connect(telegram_config).await?;
    let health = telegram.start_health_monitor(HEALTH_CHECK_INTERVAL);

    match bot_config.admin_chat_id {
        Some(admin) => info!("Admin panel enabled for chat {}", admin),
        None => warn!("ADMIN_CHAT_ID not set, admin panel disabled"),
    }
    info!(
        "Polling every {:?}, warehouse cache TTL {:?}",
        watcher_config.poll_interval, watcher_config.cache_ttl
    );

    let watcher = Arc::new(SlotWatcher::new(
        watcher_config,
        Arc::new(supplies),
        Arc::new(TelegramSender::new(telegram.clone())),
    ));

    let dispatcher = Dispatcher::new(watcher, bot_config);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let result = dispatcher.run_with_shutdown(subscribe(&telegram), shutdown).await;
    health.abort();
    result?;

    info!("Bot stopped");
    Ok(())
}
