//! Test stores: `InventoryStore` implementations for tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tigertix_core::error::DomainError;
use tigertix_core::event::{Event, NewEvent, PurchaseRecord, validate_quantity};
use tigertix_core::store::{Clock, InventoryStore, Purchase};
use tokio::sync::Mutex;

use crate::clock::{FixedClock, fixed_now};

#[derive(Debug, Default)]
struct State {
    next_event_id: i64,
    next_purchase_id: i64,
    events: BTreeMap<i64, Event>,
    purchases: Vec<PurchaseRecord>,
}

/// An in-memory store that serializes every call on one mutex. Follows the
/// same contract as the `SQLite` store, so handler and route tests can run
/// without a database.
pub struct InMemoryInventoryStore {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
    fail_purchase_log: bool,
}

impl std::fmt::Debug for InMemoryInventoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryInventoryStore")
            .field("fail_purchase_log", &self.fail_purchase_log)
            .finish_non_exhaustive()
    }
}

impl Default for InMemoryInventoryStore {
    fn default() -> Self {
        Self::new(Arc::new(FixedClock(fixed_now())))
    }
}

impl InMemoryInventoryStore {
    /// Creates an empty store stamping rows with `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
            fail_purchase_log: false,
        }
    }

    /// Makes every attributed purchase fail while writing its record, as if
    /// the purchase log insert hit a storage error.
    #[must_use]
    pub fn with_failing_purchase_log(mut self) -> Self {
        self.fail_purchase_log = true;
        self
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn create(&self, new_event: &NewEvent) -> Result<i64, DomainError> {
        new_event.validate()?;
        let mut state = self.state.lock().await;
        state.next_event_id += 1;
        let id = state.next_event_id;
        state.events.insert(
            id,
            Event {
                id,
                name: new_event.name.trim().to_owned(),
                date: new_event.date.trim().to_owned(),
                ticket_count: new_event.ticket_count,
                created_at: self.clock.now(),
            },
        );
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<Event>, DomainError> {
        let state = self.state.lock().await;
        let mut events: Vec<Event> = state.events.values().cloned().collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(events)
    }

    async fn list_available(&self) -> Result<Vec<Event>, DomainError> {
        let state = self.state.lock().await;
        let mut events: Vec<Event> = state
            .events
            .values()
            .filter(|e| e.ticket_count > 0)
            .cloned()
            .collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn get(&self, event_id: i64) -> Result<Option<Event>, DomainError> {
        Ok(self.state.lock().await.events.get(&event_id).cloned())
    }

    async fn remove(&self, event_id: i64) -> Result<bool, DomainError> {
        let mut state = self.state.lock().await;
        let removed = state.events.remove(&event_id).is_some();
        state.purchases.retain(|p| p.event_id != event_id);
        Ok(removed)
    }

    async fn purchase(&self, purchase: Purchase) -> Result<Event, DomainError> {
        validate_quantity(purchase.quantity)?;
        let mut state = self.state.lock().await;

        let remaining = state
            .events
            .get(&purchase.event_id)
            .ok_or(DomainError::EventNotFound(purchase.event_id))?
            .ticket_count;
        if remaining < purchase.quantity {
            return Err(DomainError::InsufficientInventory {
                event_id: purchase.event_id,
                requested: purchase.quantity,
                remaining,
            });
        }

        if let Some(user_id) = purchase.user_id {
            if self.fail_purchase_log {
                return Err(DomainError::Storage("failed to record purchase".into()));
            }
            state.next_purchase_id += 1;
            let record = PurchaseRecord {
                id: state.next_purchase_id,
                event_id: purchase.event_id,
                user_id,
                quantity: purchase.quantity,
                purchased_at: self.clock.now(),
            };
            state.purchases.push(record);
        }

        let event = state
            .events
            .get_mut(&purchase.event_id)
            .ok_or(DomainError::EventNotFound(purchase.event_id))?;
        event.ticket_count -= purchase.quantity;
        Ok(event.clone())
    }

    async fn purchases_for_event(&self, event_id: i64) -> Result<Vec<PurchaseRecord>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .purchases
            .iter()
            .filter(|p| p.event_id == event_id)
            .cloned()
            .collect())
    }
}

/// A store that fails every call with a storage error. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingInventoryStore;

fn connection_refused() -> DomainError {
    DomainError::Storage("connection refused".into())
}

#[async_trait]
impl InventoryStore for FailingInventoryStore {
    async fn create(&self, _new_event: &NewEvent) -> Result<i64, DomainError> {
        Err(connection_refused())
    }

    async fn list(&self) -> Result<Vec<Event>, DomainError> {
        Err(connection_refused())
    }

    async fn list_available(&self) -> Result<Vec<Event>, DomainError> {
        Err(connection_refused())
    }

    async fn get(&self, _event_id: i64) -> Result<Option<Event>, DomainError> {
        Err(connection_refused())
    }

    async fn remove(&self, _event_id: i64) -> Result<bool, DomainError> {
        Err(connection_refused())
    }

    async fn purchase(&self, _purchase: Purchase) -> Result<Event, DomainError> {
        Err(connection_refused())
    }

    async fn purchases_for_event(&self, _event_id: i64) -> Result<Vec<PurchaseRecord>, DomainError> {
        Err(connection_refused())
    }
}
