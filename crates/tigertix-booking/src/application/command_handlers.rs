//! Command handlers for the Booking context.
//!
//! Each handler validates the command, calls the inventory store once, and
//! shapes the result for the caller. Handlers never retry: the store's
//! operations are atomic, and an inventory rejection is a final answer.

use serde::Serialize;
use tigertix_core::error::DomainError;
use tigertix_core::event::{Event, NewEvent, validate_quantity};
use tigertix_core::store::{InventoryStore, Purchase};
use tracing::{info, warn};

use crate::application::query_handlers;
use crate::domain::commands::{ConfirmBooking, CreateEvent, PurchaseTickets, RemoveEvent};

/// Result of a successful client purchase.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOutcome {
    /// The event after the decrement.
    pub event: Event,
    /// Tickets bought by this purchase.
    pub tickets_purchased: i64,
    /// The purchasing user, if attributed.
    pub purchased_by: Option<i64>,
}

/// Result of a confirmed assistant booking.
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    /// The booked event.
    pub event_id: i64,
    /// Its display name.
    pub event_name: String,
    /// Tickets booked.
    pub tickets_booked: i64,
    /// Tickets left after the booking.
    pub remaining_tickets: i64,
}

/// Handles the `CreateEvent` command and returns the new event id.
///
/// # Errors
///
/// Returns `DomainError::InvalidInput` if the name or date is blank or the
/// ticket count is negative, or `DomainError::Storage` on persistence failure.
pub async fn handle_create_event(
    command: &CreateEvent,
    store: &dyn InventoryStore,
) -> Result<i64, DomainError> {
    let new_event = NewEvent::new(
        command.name.clone(),
        command.date.clone(),
        command.ticket_count,
    );
    new_event.validate()?;

    let event_id = store.create(&new_event).await?;
    info!(correlation_id = %command.correlation_id, event_id, "event created");
    Ok(event_id)
}

/// Handles the `RemoveEvent` command. Returns whether an event was deleted.
///
/// # Errors
///
/// Returns `DomainError::Storage` on persistence failure.
pub async fn handle_remove_event(
    command: &RemoveEvent,
    store: &dyn InventoryStore,
) -> Result<bool, DomainError> {
    let removed = store.remove(command.event_id).await?;
    info!(
        correlation_id = %command.correlation_id,
        event_id = command.event_id,
        removed,
        "remove event handled"
    );
    Ok(removed)
}

/// Handles the `PurchaseTickets` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidInput` for a quantity below one,
/// `DomainError::EventNotFound`, `DomainError::InsufficientInventory`, or a
/// storage error from the store.
pub async fn handle_purchase_tickets(
    command: &PurchaseTickets,
    store: &dyn InventoryStore,
) -> Result<PurchaseOutcome, DomainError> {
    validate_quantity(command.quantity)?;

    let mut purchase = Purchase::single(command.event_id).quantity(command.quantity);
    if let Some(user_id) = command.user_id {
        purchase = purchase.by_user(user_id);
    }

    let event = purchase_logged(command.correlation_id, purchase, store).await?;
    Ok(PurchaseOutcome {
        event,
        tickets_purchased: command.quantity,
        purchased_by: command.user_id,
    })
}

/// Handles the `ConfirmBooking` command: resolves the event by id, or by
/// name among available events, then purchases the tickets.
///
/// # Errors
///
/// Returns `DomainError::InvalidInput` if neither id nor name is given or the
/// ticket count is below one, `DomainError::EventNameNotFound` if the name
/// matches nothing, and any purchase error from the store.
pub async fn handle_confirm_booking(
    command: &ConfirmBooking,
    store: &dyn InventoryStore,
) -> Result<BookingConfirmation, DomainError> {
    let quantity = command.ticket_count.unwrap_or(1);
    validate_quantity(quantity)?;

    let event_id = match (command.event_id, command.event_name.as_deref()) {
        (Some(event_id), _) => event_id,
        (None, Some(name)) if !name.trim().is_empty() => {
            query_handlers::find_available_event_by_name(name, store)
                .await?
                .id
        }
        _ => {
            return Err(DomainError::InvalidInput(
                "event_id or event_name is required".into(),
            ));
        }
    };

    let mut purchase = Purchase::single(event_id).quantity(quantity);
    if let Some(user_id) = command.user_id {
        purchase = purchase.by_user(user_id);
    }

    let event = purchase_logged(command.correlation_id, purchase, store).await?;
    Ok(BookingConfirmation {
        event_id: event.id,
        event_name: event.name,
        tickets_booked: quantity,
        remaining_tickets: event.ticket_count,
    })
}

async fn purchase_logged(
    correlation_id: uuid::Uuid,
    purchase: Purchase,
    store: &dyn InventoryStore,
) -> Result<Event, DomainError> {
    match store.purchase(purchase).await {
        Ok(event) => {
            info!(
                %correlation_id,
                event_id = event.id,
                quantity = purchase.quantity,
                remaining = event.ticket_count,
                "tickets purchased"
            );
            Ok(event)
        }
        Err(err) => {
            warn!(
                %correlation_id,
                event_id = purchase.event_id,
                quantity = purchase.quantity,
                error = %err,
                "purchase failed"
            );
            Err(err)
        }
    }
}
