//! Routes for the booking assistant: available events and confirmed bookings.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use tigertix_booking::application::command_handlers::{self, BookingConfirmation};
use tigertix_booking::application::query_handlers;
use tigertix_booking::domain::commands;
use tigertix_core::event::Event;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /confirm-booking.
#[derive(Debug, Deserialize)]
pub struct ConfirmBookingRequest {
    /// Event to book; takes precedence over `event_name`.
    pub event_id: Option<i64>,
    /// Name to match against available events.
    pub event_name: Option<String>,
    /// Tickets to book; defaults to one.
    pub ticket_count: Option<i64>,
    /// Buyer to attribute the booking to.
    pub user_id: Option<i64>,
}

/// Response body for a confirmed booking.
#[derive(Debug, Serialize)]
pub struct ConfirmBookingResponse {
    /// Always `true`; failures use the error body.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
    /// Details of the booking.
    #[serde(flatten)]
    pub booking: BookingConfirmation,
}

/// GET /events
#[instrument(skip(state))]
async fn list_available_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = query_handlers::list_available_events(&*state.store).await?;
    Ok(Json(events))
}

/// POST /confirm-booking
#[instrument(skip(state, payload))]
async fn confirm_booking(
    State(state): State<AppState>,
    payload: Result<Json<ConfirmBookingRequest>, JsonRejection>,
) -> Result<Json<ConfirmBookingResponse>, ApiError> {
    let Json(request) = payload?;

    let command = commands::ConfirmBooking {
        correlation_id: Uuid::new_v4(),
        event_id: request.event_id,
        event_name: request.event_name,
        ticket_count: request.ticket_count,
        user_id: request.user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling confirm_booking command");

    let booking = command_handlers::handle_confirm_booking(&command, &*state.store).await?;

    Ok(Json(ConfirmBookingResponse {
        success: true,
        message: format!(
            "Successfully booked {} ticket(s) for {}",
            booking.tickets_booked, booking.event_name
        ),
        booking,
    }))
}

/// Returns the router for the booking assistant.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_available_events))
        .route("/confirm-booking", post(confirm_booking))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tigertix_core::event::NewEvent;
    use tigertix_core::store::InventoryStore;
    use tigertix_test_support::InMemoryInventoryStore;
    use tower::ServiceExt;

    async fn store_with(events: &[(&str, i64)]) -> Arc<InMemoryInventoryStore> {
        let store = Arc::new(InMemoryInventoryStore::default());
        for (name, count) in events {
            store
                .create(&NewEvent::new(*name, "2025-12-01", *count))
                .await
                .unwrap();
        }
        store
    }

    async fn call(store: Arc<InMemoryInventoryStore>, request: Request<Body>) -> (StatusCode, Value) {
        let app = router().with_state(AppState::new(store));
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn confirm(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/confirm-booking")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_available_events_exclude_sold_out() {
        let store = store_with(&[("Jazz Night", 0), ("Gala", 3)]).await;
        let request = Request::builder().uri("/events").body(Body::empty()).unwrap();

        let (status, json) = call(store, request).await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Gala"]);
    }

    #[tokio::test]
    async fn test_confirm_booking_by_name() {
        let store = store_with(&[("Jazz Night", 5)]).await;

        let (status, json) = call(
            store.clone(),
            confirm(&json!({ "event_name": "jazz", "ticket_count": 2 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Successfully booked 2 ticket(s) for Jazz Night");
        assert_eq!(json["event_id"], 1);
        assert_eq!(json["remaining_tickets"], 3);
        assert_eq!(store.get(1).await.unwrap().unwrap().ticket_count, 3);
    }

    #[tokio::test]
    async fn test_confirm_booking_unknown_name_returns_404() {
        let store = store_with(&[("Jazz Night", 5)]).await;

        let (status, json) = call(store, confirm(&json!({ "event_name": "opera" }))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "event_not_found");
    }

    #[tokio::test]
    async fn test_confirm_booking_without_target_returns_400() {
        let store = store_with(&[("Jazz Night", 5)]).await;

        let (status, json) = call(store, confirm(&json!({ "ticket_count": 1 }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_confirm_booking_beyond_remaining_returns_400() {
        let store = store_with(&[("Jazz Night", 1)]).await;

        let (status, json) = call(
            store,
            confirm(&json!({ "event_id": 1, "ticket_count": 4 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "insufficient_inventory");
        assert_eq!(json["remaining"], 1);
    }
}
