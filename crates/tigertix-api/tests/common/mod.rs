//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tigertix_core::store::Clock;
use tigertix_store::{SqliteInventoryStore, StoreConfig};
use tigertix_test_support::{SteppingClock, fixed_now};
use tower::ServiceExt;

use tigertix_api::state::AppState;

/// A migrated SQLite store on a throwaway database file.
///
/// Keep the `TestDb` alive for as long as the store is in use; dropping it
/// removes the directory.
pub struct TestDb {
    pub dir: TempDir,
    pub store: SqliteInventoryStore,
}

impl TestDb {
    /// Open a fresh store whose clock advances one second per event.
    pub async fn open() -> Self {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("tigertix.db").display());
        let clock: Arc<dyn Clock> = Arc::new(SteppingClock::new(
            fixed_now(),
            chrono::Duration::seconds(1),
        ));
        let store = SqliteInventoryStore::connect(&StoreConfig::new(url), clock)
            .await
            .unwrap();
        store.migrate().await.unwrap();
        Self { dir, store }
    }

    /// Build the full app router over this store, the same way `main.rs` does.
    pub fn app(&self) -> Router {
        tigertix_api::app(AppState::new(Arc::new(self.store.clone())))
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request with no body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a DELETE request and return the response.
pub async fn delete_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Create an event through the admin API and return its id.
pub async fn create_event(app: Router, name: &str, ticket_count: i64) -> i64 {
    let (status, json) = post_json(
        app,
        "/api/admin/events",
        &serde_json::json!({
            "name": name,
            "date": "2025-12-01",
            "ticket_count": ticket_count
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["event_id"].as_i64().unwrap()
}
