//! TigerTix HTTP API.
//!
//! Exposes the admin, client, and booking-assistant surfaces over one
//! shared `InventoryStore`.

use axum::Router;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use state::AppState;

/// Builds the full application router without middleware layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/admin", routes::admin::router())
        .nest("/api", routes::client::router())
        .nest("/api/llm", routes::booking::router())
        .with_state(state)
}
