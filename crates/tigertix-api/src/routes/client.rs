//! Routes for the client service: browsing events and buying tickets.

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use tigertix_booking::application::{command_handlers, query_handlers};
use tigertix_booking::domain::commands;
use tigertix_core::error::DomainError;
use tigertix_core::event::Event;

use crate::error::ApiError;
use crate::state::AppState;

/// Optional request body for POST /events/{id}/purchase.
///
/// An empty body buys a single anonymous ticket.
#[derive(Debug, Default, Deserialize)]
pub struct PurchaseRequest {
    /// Tickets to buy; defaults to one.
    pub quantity: Option<i64>,
    /// Buyer to attribute the purchase to.
    pub user_id: Option<i64>,
}

/// Response body for a successful purchase.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    /// Human-readable confirmation.
    pub message: &'static str,
    /// The event after the decrement.
    pub event: Event,
    /// Tickets left after this purchase.
    pub tickets_available: i64,
    /// Tickets bought by this request.
    pub tickets_purchased: i64,
    /// Buyer the purchase was attributed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchased_by: Option<i64>,
}

/// GET /events
#[instrument(skip(state))]
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    let events = query_handlers::list_events(&*state.store).await?;
    Ok(Json(events))
}

/// POST /events/{id}/purchase
#[instrument(skip(state, path, body))]
async fn purchase_ticket(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> Result<Json<PurchaseResponse>, ApiError> {
    let Path(event_id) = path?;
    let request = parse_purchase_request(&body)?;

    let command = commands::PurchaseTickets {
        correlation_id: Uuid::new_v4(),
        event_id,
        quantity: request.quantity.unwrap_or(1),
        user_id: request.user_id,
    };

    info!(
        correlation_id = %command.correlation_id,
        event_id,
        quantity = command.quantity,
        "handling purchase_tickets command"
    );

    let outcome = command_handlers::handle_purchase_tickets(&command, &*state.store).await?;

    Ok(Json(PurchaseResponse {
        message: "Ticket purchased successfully",
        tickets_available: outcome.event.ticket_count,
        tickets_purchased: outcome.tickets_purchased,
        purchased_by: outcome.purchased_by,
        event: outcome.event,
    }))
}

fn parse_purchase_request(body: &[u8]) -> Result<PurchaseRequest, DomainError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(PurchaseRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| DomainError::InvalidInput(format!("invalid purchase body: {e}")))
}

/// Returns the router for the client service.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/{id}/purchase", post(purchase_ticket))
}
