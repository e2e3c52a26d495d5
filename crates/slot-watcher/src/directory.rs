//! Time-bounded cache of the upstream warehouse list.

use std::sync::Arc;
use std::time::Duration;

use supply_core::{FetchError, SuppliesProvider, Warehouse};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, error, info};

struct CacheEntry {
    warehouses: Arc<Vec<Warehouse>>,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Warehouse directory with a lazily refreshed snapshot.
///
/// Refreshes are serialized by their own lock, so concurrent callers that
/// find the snapshot stale wait for one in-flight fetch instead of issuing
/// their own. Reading the snapshot never waits on a refresh.
pub struct WarehouseDirectory {
    provider: Arc<dyn SuppliesProvider>,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
    refresh: Mutex<()>,
}

impl WarehouseDirectory {
    pub fn new(provider: Arc<dyn SuppliesProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            ttl,
            entry: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// The current warehouse snapshot, refetched when missing or expired.
    ///
    /// A failed fetch caches nothing and leaves any expired snapshot in place.
    pub async fn list(&self) -> Result<Arc<Vec<Warehouse>>, FetchError> {
        if let Some(warehouses) = self.fresh().await {
            debug!("Serving {} cached warehouses", warehouses.len());
            return Ok(warehouses);
        }

        let _refresh = self.refresh.lock().await;
        // Another caller may have refreshed while we waited.
        if let Some(warehouses) = self.fresh().await {
            return Ok(warehouses);
        }

        let warehouses = match self.provider.fetch_warehouses().await {
            Ok(list) => Arc::new(list),
            Err(e) => {
                error!("Failed to fetch warehouses from {}: {}", self.provider.name(), e);
                return Err(e);
            }
        };

        info!("Fetched {} warehouses from {}", warehouses.len(), self.provider.name());
        *self.entry.write().await = Some(CacheEntry {
            warehouses: Arc::clone(&warehouses),
            fetched_at: Instant::now(),
        });

        Ok(warehouses)
    }

    async fn fresh(&self) -> Option<Arc<Vec<Warehouse>>> {
        self.entry
            .read()
            .await
            .as_ref()
            .filter(|e| e.is_fresh(self.ttl))
            .map(|e| Arc::clone(&e.warehouses))
    }

/// Warehouses whose name or address contains `city`, in upstream order.
    ///
    /// A fetch failure is logged and reported as no matches.
    pub async fn find_by_city(&self, city: &str) -> Vec<Warehouse> {
        match self.list().await {
            Ok(warehouses) => warehouses
                .iter()
                .filter(|w| w.matches_city(city))
                .cloned()
                .collect(),
            Err(e) => {
                error!("Warehouse lookup for city {:?} failed: {}", city, e);
                Vec::new()
            }
        }
    }

    /// Drop the snapshot so the next [`list`](Self::list) refetches.
    pub async fn invalidate(&self) {
        if self.entry.write().await.take().is_some() {
            info!("Warehouse cache invalidated");
        }
    }

    /// Number of warehouses in the live snapshot, zero when none is fresh.
    pub async fn cached_count(&self) -> usize {
        self.fresh().await.map_or(0, |w| w.len())
    }
}
