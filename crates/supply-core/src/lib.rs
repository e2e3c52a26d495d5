//! Core traits and types for the supply slot watch bot.
//!
//! This crate provides the shared interface between the watch engine and
//! its collaborators. It defines:
//!
//! - [`SuppliesProvider`] - The upstream warehouse list and coefficient feed
//! - [`MessageSender`] - Outbound delivery to a chat transport
//! - [`InboundMessage`] / [`OutboundMessage`] - Message types for input/output
//! - [`Warehouse`], [`AcceptanceCoefficient`], [`PackageType`] - Feed data
//! - [`FetchError`] / [`SendError`] - Error types for the collaborators
//!
//! # Example
//!
//! ```rust
//! use supply_core::{async_trait, MessageSender, OutboundMessage, SendError};
//!
//! struct StdoutSender;
//!
//! #[async_trait]
//! impl MessageSender for StdoutSender {
//!     async fn send(&self, message: &OutboundMessage) -> Result<(), SendError> {
//!         println!("{}: {}", message.recipient, message.text);
//!         Ok(())
//!     }
//! }
//! ```

mod error;
mod message;
mod model;
mod provider;
mod sender;

pub use error::{FetchError, SendError};
pub use message::{InboundMessage, OutboundMessage, UserId};
pub use model::{AcceptanceCoefficient, PackageType, Warehouse, FEED_DATE_FORMAT};
pub use provider::SuppliesProvider;
pub use sender::{LoggingSender, MessageSender, NoOpSender};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
