//! Inventory store abstraction.
//!
//! `InventoryStore` is the only sanctioned path for changing an event's
//! ticket count. Implementations must linearize purchases per event and keep
//! `ticket_count >= 0` for every reader after every completed call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::event::{Event, NewEvent, PurchaseRecord};

/// Abstraction over system time, used by stores to stamp rows.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A ticket purchase against one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Purchase {
    /// The event to buy tickets for.
    pub event_id: i64,
    /// Number of tickets, at least one.
    pub quantity: i64,
    /// When present, a `PurchaseRecord` is written in the same transaction.
    pub user_id: Option<i64>,
}

impl Purchase {
    /// A single anonymous ticket.
    #[must_use]
    pub fn single(event_id: i64) -> Self {
        Self {
            event_id,
            quantity: 1,
            user_id: None,
        }
    }

    /// Sets the quantity.
    #[must_use]
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Attributes the purchase to a user.
    #[must_use]
    pub fn by_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Owner of all event rows.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Inserts a new event and returns its generated id.
    async fn create(&self, new_event: &NewEvent) -> Result<i64, DomainError>;

    /// All events, most recently created first.
    async fn list(&self) -> Result<Vec<Event>, DomainError>;

    /// Events with tickets left, ordered by date.
    async fn list_available(&self) -> Result<Vec<Event>, DomainError>;

    /// A single event, or `None` if it does not exist.
    async fn get(&self, event_id: i64) -> Result<Option<Event>, DomainError>;

    /// Deletes an event. Returns whether a row was removed.
    async fn remove(&self, event_id: i64) -> Result<bool, DomainError>;

    /// Atomically decrements the event's ticket count by `purchase.quantity`
    /// and returns the post-decrement snapshot.
    ///
    /// Existence and remaining-count checks run inside the same transaction
    /// as the decrement.
    async fn purchase(&self, purchase: Purchase) -> Result<Event, DomainError>;

    /// The purchase log of an event, oldest first.
    async fn purchases_for_event(&self, event_id: i64)
    -> Result<Vec<PurchaseRecord>, DomainError>;
}
