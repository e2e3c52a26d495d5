//! The assembled watch engine.

use std::sync::Arc;

use supply_core::{InboundMessage, MessageSender, OutboundMessage, SuppliesProvider, UserId};
use tracing::{info, warn};

use crate::admin::{active_watches_report, panel_choices, statistics_report, AdminCommand};
use crate::config::WatcherConfig;
use crate::directory::WarehouseDirectory;
use crate::i18n::{negotiate_language, translate, Language, TextKey};
use crate::poller::ConditionPoller;
use crate::router::ConversationRouter;
use crate::scheduler::WatchScheduler;
use crate::state::StateStore;

/// Conversation handling, watches and admin reporting behind one handle.
pub struct SlotWatcher {
    config: WatcherConfig,
    directory: Arc<WarehouseDirectory>,
    states: Arc<StateStore>,
    scheduler: WatchScheduler,
    router: ConversationRouter,
    sender: Arc<dyn MessageSender>,
}

impl SlotWatcher {
    pub fn new(
        config: WatcherConfig,
        provider: Arc<dyn SuppliesProvider>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        let directory = Arc::new(WarehouseDirectory::new(Arc::clone(&provider), config.cache_ttl));
        let states = Arc::new(StateStore::new());
        let poller = ConditionPoller::new(
            provider,
            Arc::clone(&sender),
            Arc::clone(&states),
            config.poll_interval,
        );
        let scheduler = WatchScheduler::new(poller);
        let router = ConversationRouter::new(
            Arc::clone(&directory),
            Arc::clone(&states),
            scheduler.clone(),
            Arc::clone(&sender),
            config.default_language,
        );

        Self {
            config,
            directory,
            states,
            scheduler,
            router,
            sender,
        }
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &WatchScheduler {
        &self.scheduler
    }

    pub fn states(&self) -> &StateStore {
        &self.states
    }

    /// Advance the sender's conversation. Returns the replies sent.
    pub async fn handle_message(&self, message: &InboundMessage) -> Vec<OutboundMessage> {
        self.router.handle(message).await
    }

    /// Run an admin command for an already authorized sender.
    pub async fn handle_admin(&self, message: &InboundMessage, command: AdminCommand) -> OutboundMessage {
        let lang = self.language_for(message).await;
        info!("Admin {} requested {:?}", message.sender, command);

        let reply = match command {
            AdminCommand::Panel => {
                OutboundMessage::reply_to(message, translate(lang, TextKey::AdminChooseAction))
                    .with_choices(panel_choices(lang))
            }
            AdminCommand::ActiveWatches => {
                let watches = self.scheduler.snapshots().await;
                let report = active_watches_report(lang, watches.iter().map(|w| &**w));
                OutboundMessage::reply_to(message, report)
            }
            AdminCommand::ClearCache => {
                self.clear_warehouse_cache().await;
                OutboundMessage::reply_to(message, translate(lang, TextKey::CacheCleared))
            }
            AdminCommand::Statistics => {
                let report = statistics_report(
                    lang,
                    self.count_users().await,
                    self.count_cached_warehouses().await,
                    self.scheduler.len().await,
                );
                OutboundMessage::reply_to(message, report)
            }
        };

        self.deliver(&reply).await;
        reply
    }

    /// Tell a sender they may not use the admin panel.
    pub async fn deny_admin(&self, message: &InboundMessage) -> OutboundMessage {
        warn!("User {} tried to open the admin panel", message.sender);
        let lang = self.language_for(message).await;
        let reply = OutboundMessage::reply_to(message, translate(lang, TextKey::NoPermission));
        self.deliver(&reply).await;
        reply
    }

    /// Users with a running watch.
    pub async fn active_watches(&self) -> Vec<UserId> {
        self.scheduler.list().await
    }

    pub async fn clear_warehouse_cache(&self) {
        self.directory.invalidate().await;
    }

    /// Users with a conversation on record.
    pub async fn count_users(&self) -> usize {
        self.states.count().await
    }

    pub async fn count_cached_warehouses(&self) -> usize {
        self.directory.cached_count().await
    }

    /// Stop every watch and wait for the pollers to exit.
    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
    }

    async fn language_for(&self, message: &InboundMessage) -> Language {
        match self.states.get(message.sender).await {
            Some(state) => state.language(),
            None => negotiate_language(&message.language_tags, self.config.default_language),
        }
    }

    async fn deliver(&self, message: &OutboundMessage) {
        if let Err(e) = self.sender.send(message).await {
            warn!("Failed to reply to user {}: {}", message.recipient, e);
        }
    }
}
