//! The upstream supplies feed.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::{AcceptanceCoefficient, Warehouse};

/// Source of the warehouse directory and acceptance coefficients.
///
/// Implementations must be cheap to share behind an `Arc`; the watch engine
/// calls them concurrently from the conversation path and every poller.
#[async_trait]
pub trait SuppliesProvider: Send + Sync {
    /// Fetch the full warehouse list.
    async fn fetch_warehouses(&self) -> Result<Vec<Warehouse>, FetchError>;

    /// Fetch acceptance coefficients for one warehouse, in feed order.
    async fn fetch_coefficients(
        &self,
        warehouse_id: i64,
    ) -> Result<Vec<AcceptanceCoefficient>, FetchError>;

    /// Get a human-readable name for this provider.
    fn name(&self) -> &str;
}
