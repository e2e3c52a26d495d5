//! Per-user conversation state.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use supply_core::{PackageType, UserId, Warehouse};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::error::OutOfOrder;
use crate::i18n::Language;

/// Position in the selection funnel: the next field the user must supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    City,
    Warehouse,
    PackageType,
    Coefficient,
    StartDate,
    EndDate,
    Complete,
}

/// Finalized watch parameters, captured when the funnel completes.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchSnapshot {
    pub user: UserId,
    pub session: u64,
    pub language: Language,
    pub warehouse_id: i64,
    pub warehouse_name: String,
    pub package_type: PackageType,
    pub coefficient: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl WatchSnapshot {
    /// Whether `date` falls in the watch window, bounds included.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// One user's progress through the funnel.
///
/// Fields are filled strictly in order and never overwritten; starting over
/// means replacing the whole state.
#[derive(Debug, Clone)]
pub struct ConversationState {
    session: u64,
    language: Language,
    city: Option<String>,
    candidates: Vec<Warehouse>,
    warehouse: Option<Warehouse>,
    package_type: Option<PackageType>,
    coefficient: Option<f64>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl ConversationState {
    pub fn new(session: u64, language: Language) -> Self {
        Self {
            session,
            language,
            city: None,
            candidates: Vec::new(),
            warehouse: None,
            package_type: None,
            coefficient: None,
            start_date: None,
            end_date: None,
        }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Warehouses matching the city, offered for selection.
    pub fn candidates(&self) -> &[Warehouse] {
        &self.candidates
    }

    pub fn warehouse(&self) -> Option<&Warehouse> {
        self.warehouse.as_ref()
    }

    pub fn package_type(&self) -> Option<PackageType> {
        self.package_type
    }

    pub fn coefficient(&self) -> Option<f64> {
        self.coefficient
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// The first unset field.
    pub fn stage(&self) -> Stage {
        if self.city.is_none() {
            Stage::City
        } else if self.warehouse.is_none() {
            Stage::Warehouse
        } else if self.package_type.is_none() {
            Stage::PackageType
        } else if self.coefficient.is_none() {
            Stage::Coefficient
        } else if self.start_date.is_none() {
            Stage::StartDate
        } else if self.end_date.is_none() {
            Stage::EndDate
        } else {
            Stage::Complete
        }
    }

    fn expect_stage(&self, attempted: Stage) -> Result<(), OutOfOrder> {
        let current = self.stage();
        if current != attempted {
            return Err(OutOfOrder { current, attempted });
        }
        Ok(())
    }

    pub fn set_city(
        &mut self,
        city: impl Into<String>,
        candidates: Vec<Warehouse>,
    ) -> Result<(), OutOfOrder> {
        self.expect_stage(Stage::City)?;
        self.city = Some(city.into());
        self.candidates = candidates;
        Ok(())
    }

    pub fn set_warehouse(&mut self, warehouse: Warehouse) -> Result<(), OutOfOrder> {
        self.expect_stage(Stage::Warehouse)?;
        self.warehouse = Some(warehouse);
        self.candidates.clear();
        Ok(())
    }

    pub fn set_package_type(&mut self, package_type: PackageType) -> Result<(), OutOfOrder> {
        self.expect_stage(Stage::PackageType)?;
        self.package_type = Some(package_type);
        Ok(())
    }

    pub fn set_coefficient(&mut self, coefficient: f64) -> Result<(), OutOfOrder> {
        self.expect_stage(Stage::Coefficient)?;
        self.coefficient = Some(coefficient);
        Ok(())
    }

    pub fn set_start_date(&mut self, date: NaiveDate) -> Result<(), OutOfOrder> {
        self.expect_stage(Stage::StartDate)?;
        self.start_date = Some(date);
        Ok(())
    }

    /// Set the end date. Callers validate it against the start date first.
    pub fn set_end_date(&mut self, date: NaiveDate) -> Result<(), OutOfOrder> {
        self.expect_stage(Stage::EndDate)?;
        self.end_date = Some(date);
        Ok(())
    }

    /// Watch parameters, once every field is set.
    pub fn snapshot(&self, user: UserId) -> Option<WatchSnapshot> {
        let warehouse = self.warehouse.as_ref()?;
        Some(WatchSnapshot {
            user,
            session: self.session,
            language: self.language,
            warehouse_id: warehouse.id,
            warehouse_name: warehouse.name.clone(),
            package_type: self.package_type?,
            coefficient: self.coefficient?,
            start_date: self.start_date?,
            end_date: self.end_date?,
        })
    }
}

/// A user's slot in the store. Locking it serializes that user's updates.
pub type StateSlot = Arc<Mutex<Option<ConversationState>>>;

/// Conversation states keyed by user.
///
/// The outer map lock is only held to look up or insert a slot; all
/// mutation happens under the per-user slot lock, so different users never
/// wait on each other.
#[derive(Default)]
pub struct StateStore {
    slots: RwLock<HashMap<UserId, StateSlot>>,
    // Users holding a conversation; readable without touching slot locks.
    occupied: RwLock<HashSet<UserId>>,
    next_session: AtomicU64,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's slot, created empty on first access.
    pub async fn slot(&self, user: UserId) -> StateSlot {
        if let Some(slot) = self.slots.read().await.get(&user) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write().await;
        Arc::clone(slots.entry(user).or_default())
    }

    /// A fresh conversation for `user` with a new session number.
    ///
    /// The caller stores it in the user's slot while holding the slot lock.
    pub async fn begin(&self, user: UserId, language: Language) -> ConversationState {
        let session = self.next_session.fetch_add(1, Ordering::Relaxed) + 1;
        self.occupied.write().await.insert(user);
        ConversationState::new(session, language)
    }

    /// A copy of the user's current state.
    pub async fn get(&self, user: UserId) -> Option<ConversationState> {
        let slot = self.slots.read().await.get(&user).cloned()?;
        let state = slot.lock().await;
        state.clone()
    }

    /// Delete the user's conversation if it is still session `session`.
    ///
    /// Returns whether a state was removed.
    pub async fn remove_if_session(&self, user: UserId, session: u64) -> bool {
        let Some(slot) = self.slots.read().await.get(&user).cloned() else {
            return false;
        };

        let removed = {
            let mut state = slot.lock().await;
            if state.as_ref().map(ConversationState::session) == Some(session) {
                *state = None;
                self.occupied.write().await.remove(&user);
                true
            } else {
                false
            }
        };
        drop(slot);

        if removed {
            debug!("Removed conversation {} for user {}", session, user);
            self.prune(user).await;
        }
        removed
    }

    /// Number of users with a conversation in progress or completed.
    ///
    /// Never waits on a slot that is busy handling a message.
    pub async fn count(&self) -> usize {
        self.occupied.read().await.len()
    }

    /// Drop an empty slot nobody else holds.
    async fn prune(&self, user: UserId) {
        let mut slots = self.slots.write().await;
        let unused = slots.get(&user).is_some_and(|slot| {
            Arc::strong_count(slot) == 1 && slot.try_lock().is_ok_and(|state| state.is_none())
        });
        if unused {
            slots.remove(&user);
        }
    }
}
