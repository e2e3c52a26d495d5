//! Provider wrapper that adds artificial latency.

use std::sync::Arc;
use std::time::Duration;

use supply_core::{async_trait, AcceptanceCoefficient, FetchError, SuppliesProvider, Warehouse};
use tokio::time::sleep;

/// Wraps another provider and sleeps before every call.
///
/// Useful for exercising concurrent cache refreshes and cancellation of an
/// in-flight fetch.
pub struct DelayedSupplies {
    inner: Arc<dyn SuppliesProvider>,
    delay: Duration,
}

impl DelayedSupplies {
    pub fn new(inner: Arc<dyn SuppliesProvider>, delay: Duration) -> Self {
        Self { inner, delay }
    }

    pub fn with_secs(inner: Arc<dyn SuppliesProvider>, secs: u64) -> Self {
        Self::new(inner, Duration::from_secs(secs))
    }
}

#[async_trait]
impl SuppliesProvider for DelayedSupplies {
    async fn fetch_warehouses(&self) -> Result<Vec<Warehouse>, FetchError> {
        sleep(self.delay).await;
        self.inner.fetch_warehouses().await
    }

    async fn fetch_coefficients(&self, warehouse_id: i64) -> Result<Vec<AcceptanceCoefficient>, FetchError> {
        sleep(self.delay).await;
        self.inner.fetch_coefficients(warehouse_id).await
    }

    fn name(&self) -> &str {
        "DelayedSupplies"
    }
}
