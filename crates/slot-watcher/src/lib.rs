//! Supply slot watch engine.
//!
//! Guides each user through choosing a warehouse, package type, acceptance
//! coefficient and date window, then polls the coefficient feed in the
//! background until a matching slot appears.
//!
//! The engine only talks to the outside world through the
//! [`SuppliesProvider`](supply_core::SuppliesProvider) and
//! [`MessageSender`](supply_core::MessageSender) traits.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use slot_watcher::{SlotWatcher, WatcherConfig};
//! use supply_core::{InboundMessage, LoggingSender, UserId};
//! # use supply_core::{async_trait, AcceptanceCoefficient, FetchError, SuppliesProvider, Warehouse};
//! # struct Feed;
//! # #[async_trait]
//! # impl SuppliesProvider for Feed {
//! #     async fn fetch_warehouses(&self) -> Result<Vec<Warehouse>, FetchError> { Ok(vec![]) }
//! #     async fn fetch_coefficients(&self, _: i64) -> Result<Vec<AcceptanceCoefficient>, FetchError> { Ok(vec![]) }
//! #     fn name(&self) -> &str { "feed" }
//! # }
//!
//! # async fn run() {
//! let watcher = SlotWatcher::new(WatcherConfig::default(), Arc::new(Feed), Arc::new(LoggingSender));
//! watcher.handle_message(&InboundMessage::new(UserId(42), "/start", 0)).await;
//! watcher.handle_message(&InboundMessage::new(UserId(42), "Moscow", 0)).await;
//! # }
//! ```

pub mod admin;
pub mod config;
pub mod directory;
pub mod error;
pub mod i18n;
pub mod poller;
pub mod router;
pub mod scheduler;
pub mod state;
pub mod validators;
mod watcher;

pub use admin::AdminCommand;
pub use config::WatcherConfig;
pub use directory::WarehouseDirectory;
pub use error::{ConfigError, OutOfOrder, ScheduleError};
pub use i18n::{negotiate_language, translate, Language, TextKey};
pub use poller::{ConditionPoller, PollOutcome};
pub use router::ConversationRouter;
pub use scheduler::WatchScheduler;
pub use state::{ConversationState, Stage, StateStore, WatchSnapshot};
pub use validators::ValidationError;
pub use watcher::SlotWatcher;
