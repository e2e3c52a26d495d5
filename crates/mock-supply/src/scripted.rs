//! Provider that replays scripted responses.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use supply_core::{async_trait, AcceptanceCoefficient, FetchError, SuppliesProvider, Warehouse};
use tokio::sync::Mutex;
use tracing::debug;

/// One scripted answer of the coefficient feed.
#[derive(Debug, Clone)]
pub enum FeedResponse {
    Rows(Vec<AcceptanceCoefficient>),
    /// Fail with [`FetchError::Unavailable`].
    Fail(String),
}

/// A provider backed by a fixed warehouse list and a queue of feed answers.
///
/// Each coefficient fetch pops the next queued answer; once the queue is
/// empty every fetch returns no rows.
pub struct ScriptedSupplies {
    warehouses: Mutex<Result<Vec<Warehouse>, String>>,
    feed: Mutex<VecDeque<FeedResponse>>,
    requested: Mutex<Vec<i64>>,
    warehouse_fetches: AtomicUsize,
    coefficient_fetches: AtomicUsize,
}

impl ScriptedSupplies {
    pub fn new(warehouses: Vec<Warehouse>) -> Self {
        Self {
            warehouses: Mutex::new(Ok(warehouses)),
            feed: Mutex::new(VecDeque::new()),
            requested: Mutex::new(Vec::new()),
            warehouse_fetches: AtomicUsize::new(0),
            coefficient_fetches: AtomicUsize::new(0),
        }
    }

    /// Replace the warehouse list served from now on.
    pub async fn set_warehouses(&self, warehouses: Vec<Warehouse>) {
        *self.warehouses.lock().await = Ok(warehouses);
    }

    /// Make warehouse fetches fail until [`set_warehouses`](Self::set_warehouses).
    pub async fn fail_warehouses(&self, reason: impl Into<String>) {
        *self.warehouses.lock().await = Err(reason.into());
    }

    /// Queue the answer for a later coefficient fetch.
    pub async fn push_feed(&self, response: FeedResponse) {
        self.feed.lock().await.push_back(response);
    }

    pub fn warehouse_fetches(&self) -> usize {
        self.warehouse_fetches.load(Ordering::SeqCst)
    }

    pub fn coefficient_fetches(&self) -> usize {
        self.coefficient_fetches.load(Ordering::SeqCst)
    }

    /// Warehouse ids passed to coefficient fetches, in call order.
    pub async fn requested_warehouses(&self) -> Vec<i64> {
        self.requested.lock().await.clone()
    }
}

#[async_trait]
impl SuppliesProvider for ScriptedSupplies {
    async fn fetch_warehouses(&self) -> Result<Vec<Warehouse>, FetchError> {
        self.warehouse_fetches.fetch_add(1, Ordering::SeqCst);
        self.warehouses
            .lock()
            .await
            .clone()
            .map_err(FetchError::Unavailable)
    }

    async fn fetch_coefficients(&self, warehouse_id: i64) -> Result<Vec<AcceptanceCoefficient>, FetchError> {
        self.coefficient_fetches.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().await.push(warehouse_id);

        let next = self.feed.lock().await.pop_front();
        debug!("Scripted feed for warehouse {}: {:?}", warehouse_id, next);
        match next {
            Some(FeedResponse::Rows(rows)) => Ok(rows),
            Some(FeedResponse::Fail(reason)) => Err(FetchError::Unavailable(reason)),
            None => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &str {
        "ScriptedSupplies"
    }
}
