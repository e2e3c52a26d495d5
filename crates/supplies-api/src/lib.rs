//! Wildberries supplies API client.
//!
//! Implements [`SuppliesProvider`](supply_core::SuppliesProvider) on top of
//! the public supplies API:
//!
//! - `GET /api/v1/warehouses` - the warehouse directory
//! - `GET /api/v1/acceptance/coefficients?warehouseIDs=` - acceptance slots
//!
//! # Example
//!
//! ```no_run
//! use supplies_api::{SuppliesApiConfig, SuppliesClient};
//! use supply_core::SuppliesProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SuppliesClient::new(SuppliesApiConfig::new("my-api-key"))?;
//! for warehouse in client.fetch_warehouses().await? {
//!     println!("{}", warehouse.label());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::SuppliesClient;
pub use config::{SuppliesApiConfig, DEFAULT_BASE_URL};
pub use error::SuppliesApiError;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
