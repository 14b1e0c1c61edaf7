//! TigerTix API server entry point.

use std::sync::Arc;

use tigertix_api::config::Config;
use tigertix_api::error::AppError;
use tigertix_api::state::AppState;
use tigertix_api::telemetry;
use tigertix_core::store::SystemClock;
use tigertix_store::SqliteInventoryStore;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let telemetry = telemetry::init("tigertix-api")?;

    tracing::info!("Starting TigerTix API server");

    let config = Config::from_env()?;

    // The store is opened once here and closed after the server drains.
    let store = SqliteInventoryStore::connect(&config.store, Arc::new(SystemClock)).await?;
    store.migrate().await?;

    let app_state = AppState::new(Arc::new(store.clone()));

    let app = tigertix_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(config.cors_layer()?);

    let addr = config.bind_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    telemetry.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
