//! Commands for the Booking context.

use uuid::Uuid;

/// Command to create an event (admin).
#[derive(Debug, Clone)]
pub struct CreateEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Display name.
    pub name: String,
    /// Event date.
    pub date: String,
    /// Initial ticket pool.
    pub ticket_count: i64,
}

/// Command to delete an event (admin).
#[derive(Debug, Clone)]
pub struct RemoveEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The event identifier.
    pub event_id: i64,
}

/// Command to buy tickets for a known event (client).
#[derive(Debug, Clone)]
pub struct PurchaseTickets {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The event identifier.
    pub event_id: i64,
    /// Number of tickets.
    pub quantity: i64,
    /// The purchasing user, when known.
    pub user_id: Option<i64>,
}

/// Command to confirm a booking proposed by the booking assistant. The
/// event is identified by id or, failing that, by name.
#[derive(Debug, Clone)]
pub struct ConfirmBooking {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The event identifier, if the assistant resolved one.
    pub event_id: Option<i64>,
    /// The event name as the user phrased it.
    pub event_name: Option<String>,
    /// Number of tickets; defaults to one.
    pub ticket_count: Option<i64>,
    /// The purchasing user, when known.
    pub user_id: Option<i64>,
}
