//! Ticketed event model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A ticketed occasion with a finite, decrementing inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Identifier assigned by the store on creation.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Event date as entered by the organizer; not interpreted.
    pub date: String,
    /// Tickets still available. Never negative.
    pub ticket_count: i64,
    /// Creation timestamp, used for default ordering.
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// Display name.
    pub name: String,
    /// Event date.
    pub date: String,
    /// Initial ticket pool.
    pub ticket_count: i64,
}

impl NewEvent {
    /// Creates a new `NewEvent`.
    pub fn new(name: impl Into<String>, date: impl Into<String>, ticket_count: i64) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            ticket_count,
        }
    }

    /// Checks the fields a store requires before inserting.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInput` if the name or date is blank or the
    /// ticket count is negative.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidInput("name must not be empty".into()));
        }
        if self.date.trim().is_empty() {
            return Err(DomainError::InvalidInput("date must not be empty".into()));
        }
        if self.ticket_count < 0 {
            return Err(DomainError::InvalidInput(format!(
                "ticket_count must be non-negative, got {}",
                self.ticket_count
            )));
        }
        Ok(())
    }
}

/// Append-only record of a committed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Record identifier.
    pub id: i64,
    /// The event the tickets were bought for.
    pub event_id: i64,
    /// The purchasing user.
    pub user_id: i64,
    /// Number of tickets bought.
    pub quantity: i64,
    /// Commit timestamp.
    pub purchased_at: DateTime<Utc>,
}

/// Validates a purchase quantity.
///
/// # Errors
///
/// Returns `DomainError::InvalidInput` if `quantity` is less than one.
pub fn validate_quantity(quantity: i64) -> Result<(), DomainError> {
    if quantity < 1 {
        return Err(DomainError::InvalidInput(format!(
            "quantity must be at least 1, got {quantity}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_new_event_passes() {
        assert!(NewEvent::new("Concert", "2025-12-01", 0).validate().is_ok());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let result = NewEvent::new("   ", "2025-12-01", 10).validate();
        match result {
            Err(DomainError::InvalidInput(msg)) => assert!(msg.contains("name")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_date_is_rejected() {
        let result = NewEvent::new("Concert", "", 10).validate();
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_negative_ticket_count_is_rejected() {
        let result = NewEvent::new("Concert", "2025-12-01", -1).validate();
        match result {
            Err(DomainError::InvalidInput(msg)) => assert!(msg.contains("-1")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(1).is_ok());
    }

    #[test]
    fn test_event_serializes_with_snake_case_fields() {
        let event = Event {
            id: 1,
            name: "Concert".into(),
            date: "2025-12-01".into(),
            ticket_count: 5,
            created_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
        };

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["ticket_count"], 5);
        assert_eq!(json["name"], "Concert");
        assert!(json["created_at"].is_string());
    }
}
