//! Query handlers for the Booking context.
//!
//! Read-only views over the inventory store. Reads see every purchase that
//! committed before they started.

use tigertix_core::error::DomainError;
use tigertix_core::event::{Event, PurchaseRecord};
use tigertix_core::store::InventoryStore;

use crate::domain::matching::best_match;

/// All events, most recently created first.
///
/// # Errors
///
/// Returns `DomainError::Storage` if the store cannot be read.
pub async fn list_events(store: &dyn InventoryStore) -> Result<Vec<Event>, DomainError> {
    store.list().await
}

/// Retrieves a single event.
///
/// # Errors
///
/// Returns `DomainError::EventNotFound` if no event has this id.
/// Returns `DomainError::Storage` if the store cannot be read.
pub async fn get_event(event_id: i64, store: &dyn InventoryStore) -> Result<Event, DomainError> {
    store
        .get(event_id)
        .await?
        .ok_or(DomainError::EventNotFound(event_id))
}

/// Events that still have tickets, ordered by date.
///
/// # Errors
///
/// Returns `DomainError::Storage` if the store cannot be read.
pub async fn list_available_events(store: &dyn InventoryStore) -> Result<Vec<Event>, DomainError> {
    store.list_available().await
}

/// Finds the available event best matching `name`.
///
/// # Errors
///
/// Returns `DomainError::EventNameNotFound` if nothing matches.
/// Returns `DomainError::Storage` if the store cannot be read.
pub async fn find_available_event_by_name(
    name: &str,
    store: &dyn InventoryStore,
) -> Result<Event, DomainError> {
    let available = store.list_available().await?;
    best_match(&available, name)
        .cloned()
        .ok_or_else(|| DomainError::EventNameNotFound(name.trim().to_owned()))
}

/// The purchase log of an event, oldest first.
///
/// # Errors
///
/// Returns `DomainError::EventNotFound` if no event has this id.
/// Returns `DomainError::Storage` if the store cannot be read.
pub async fn list_purchases(
    event_id: i64,
    store: &dyn InventoryStore,
) -> Result<Vec<PurchaseRecord>, DomainError> {
    get_event(event_id, store).await?;
    store.purchases_for_event(event_id).await
}
