//! Mock collaborators for testing the slot watcher.
//!
//! This crate provides:
//! - [`ScriptedSupplies`] - A provider that replays scripted feed responses
//! - [`DelayedSupplies`] - Wraps another provider with artificial latency
//! - [`RecordingSender`] - A sender that records every delivered message
//!
//! # Example
//!
//! ```rust
//! use mock_supply::{FeedResponse, ScriptedSupplies};
//! use supply_core::{AcceptanceCoefficient, SuppliesProvider, Warehouse};
//!
//! #[tokio::main]
//! async fn main() {
//!     let supplies = ScriptedSupplies::new(vec![Warehouse::new(507, "Коледино", "Подольск")]);
//!     supplies
//!         .push_feed(FeedResponse::Rows(vec![AcceptanceCoefficient::new(
//!             "2025-01-06T00:00:00Z",
//!             "Короба",
//!             1.0,
//!         )]))
//!         .await;
//!
//!     let rows = supplies.fetch_coefficients(507).await.unwrap();
//!     assert_eq!(rows.len(), 1);
//! }
//! ```

mod delayed;
mod recording;
mod scripted;

pub use delayed::DelayedSupplies;
pub use recording::RecordingSender;
pub use scripted::{FeedResponse, ScriptedSupplies};

// Re-export supply-core types for convenience
pub use supply_core::{AcceptanceCoefficient, FetchError, OutboundMessage, UserId, Warehouse};
