//! Routes for the admin service: event creation and management.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use tigertix_booking::application::{command_handlers, query_handlers};
use tigertix_booking::domain::commands;
use tigertix_core::error::DomainError;
use tigertix_core::event::{Event, PurchaseRecord};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /events.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    /// Display name.
    pub name: Option<String>,
    /// Event date.
    pub date: Option<String>,
    /// Initial ticket pool.
    pub ticket_count: Option<i64>,
}

/// Response body for POST /events.
#[derive(Debug, Serialize)]
pub struct CreateEventResponse {
    /// Human-readable confirmation.
    pub message: &'static str,
    /// The generated event id.
    pub event_id: i64,
}

/// Response body for DELETE /events/{id}.
#[derive(Debug, Serialize)]
pub struct DeleteEventResponse {
    /// The event id from the path.
    pub event_id: i64,
    /// Whether a row was removed by this call.
    pub deleted: bool,
}

/// GET /events
#[instrument(skip(state))]
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    let events = query_handlers::list_events(&*state.store).await?;
    Ok(Json(events))
}

/// POST /events
#[instrument(skip(state, payload))]
async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateEventResponse>), ApiError> {
    let Json(request) = payload?;
    let (Some(name), Some(date), Some(ticket_count)) =
        (request.name, request.date, request.ticket_count)
    else {
        return Err(DomainError::InvalidInput(
            "missing required fields: name, date, ticket_count".into(),
        )
        .into());
    };

    let command = commands::CreateEvent {
        correlation_id: Uuid::new_v4(),
        name,
        date,
        ticket_count,
    };

    info!(correlation_id = %command.correlation_id, "handling create_event command");

    let event_id = command_handlers::handle_create_event(&command, &*state.store).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateEventResponse {
            message: "Event created successfully",
            event_id,
        }),
    ))
}

/// GET /events/{id}
#[instrument(skip(state, path))]
async fn get_event(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Event>, ApiError> {
    let Path(event_id) = path?;
    let event = query_handlers::get_event(event_id, &*state.store).await?;
    Ok(Json(event))
}

/// DELETE /events/{id}
#[instrument(skip(state, path))]
async fn delete_event(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteEventResponse>, ApiError> {
    let Path(event_id) = path?;
    let command = commands::RemoveEvent {
        correlation_id: Uuid::new_v4(),
        event_id,
    };

    info!(correlation_id = %command.correlation_id, event_id, "handling remove_event command");

    let deleted = command_handlers::handle_remove_event(&command, &*state.store).await?;

    Ok(Json(DeleteEventResponse { event_id, deleted }))
}

/// GET /events/{id}/purchases
#[instrument(skip(state, path))]
async fn list_purchases(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<PurchaseRecord>>, ApiError> {
    let Path(event_id) = path?;
    let records = query_handlers::list_purchases(event_id, &*state.store).await?;
    Ok(Json(records))
}

/// Returns the router for the admin service.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", get(get_event).delete(delete_event))
        .route("/events/{id}/purchases", get(list_purchases))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tigertix_core::store::InventoryStore;
    use tigertix_test_support::{FailingInventoryStore, InMemoryInventoryStore};
    use tower::ServiceExt;

    fn app_with(store: Arc<dyn InventoryStore>) -> Router {
        router().with_state(AppState::new(store))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_create_event_returns_201_with_id() {
        // Arrange
        let store = Arc::new(InMemoryInventoryStore::default());
        let app = app_with(store.clone());
        let body = serde_json::json!({
            "name": "Concert",
            "date": "2025-12-01",
            "ticket_count": 100
        });

        // Act
        let (status, json) = send(app, "POST", "/events", Some(body)).await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["event_id"], 1);
        assert_eq!(json["message"], "Event created successfully");
        assert_eq!(store.get(1).await.unwrap().unwrap().ticket_count, 100);
    }

    #[tokio::test]
    async fn test_create_event_missing_field_returns_400() {
        let app = app_with(Arc::new(InMemoryInventoryStore::default()));
        let body = serde_json::json!({ "name": "Concert", "date": "2025-12-01" });

        let (status, json) = send(app, "POST", "/events", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_input");
        assert!(json["message"].as_str().unwrap().contains("ticket_count"));
    }

    #[tokio::test]
    async fn test_create_event_negative_count_returns_400() {
        let app = app_with(Arc::new(InMemoryInventoryStore::default()));
        let body = serde_json::json!({
            "name": "Concert",
            "date": "2025-12-01",
            "ticket_count": -1
        });

        let (status, json) = send(app, "POST", "/events", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_create_event_non_numeric_count_returns_400() {
        let app = app_with(Arc::new(InMemoryInventoryStore::default()));
        let body = serde_json::json!({
            "name": "Concert",
            "date": "2025-12-01",
            "ticket_count": "lots"
        });

        let (status, json) = send(app, "POST", "/events", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_get_missing_event_returns_404() {
        let app = app_with(Arc::new(InMemoryInventoryStore::default()));

        let (status, json) = send(app, "GET", "/events/7", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "event_not_found");
    }

    #[tokio::test]
    async fn test_get_event_with_non_numeric_id_returns_400() {
        let app = app_with(Arc::new(InMemoryInventoryStore::default()));

        let (status, json) = send(app, "GET", "/events/abc", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_delete_event_twice_reports_deleted_then_not() {
        let store = Arc::new(InMemoryInventoryStore::default());
        store
            .create(&tigertix_core::event::NewEvent::new("Concert", "2025-12-01", 1))
            .await
            .unwrap();

        let (first_status, first) = send(app_with(store.clone()), "DELETE", "/events/1", None).await;
        let (second_status, second) = send(app_with(store), "DELETE", "/events/1", None).await;

        assert_eq!(first_status, StatusCode::OK);
        assert_eq!(first["deleted"], true);
        assert_eq!(second_status, StatusCode::OK);
        assert_eq!(second["deleted"], false);
    }

    #[tokio::test]
    async fn test_list_events_storage_failure_returns_500() {
        let app = app_with(Arc::new(FailingInventoryStore));

        let (status, json) = send(app, "GET", "/events", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "storage_error");
    }
}
