//! Domain error types.

use std::time::Duration;

use thiserror::Error;

/// Top-level domain error type.
///
/// Every store operation either applies fully or fails with one of these
/// variants, leaving persisted state as if the operation never ran.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or out-of-range arguments.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The referenced event does not exist.
    #[error("event not found: {0}")]
    EventNotFound(i64),

    /// No available event matches the given name.
    #[error("no available event matches \"{0}\"")]
    EventNameNotFound(String),

    /// Not enough tickets left to satisfy the purchase.
    #[error("only {remaining} ticket(s) available for event {event_id}, requested {requested}")]
    InsufficientInventory {
        /// The event the purchase targeted.
        event_id: i64,
        /// The quantity the caller asked for.
        requested: i64,
        /// The tickets remaining at the time of the check.
        remaining: i64,
    },

    /// The persistence layer failed. The message never carries engine details.
    #[error("storage error: {0}")]
    Storage(String),

    /// The transaction exceeded its time budget and was rolled back.
    #[error("storage timed out after {}ms", .0.as_millis())]
    StorageTimeout(Duration),
}

impl DomainError {
    /// Whether the whole operation may be safely retried.
    ///
    /// Business rejections and caller errors are final; storage failures are
    /// retryable because every operation is atomic.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::StorageTimeout(_))
    }
}
