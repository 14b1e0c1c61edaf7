//! API error types and their HTTP mapping.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tigertix_core::error::DomainError;
use tracing::error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or schema error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Tracing exporter setup failed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Tickets left, for inventory rejections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<i64>,
    /// Tickets asked for, for inventory rejections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<i64>,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DomainError::InvalidInput(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(DomainError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            DomainError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            DomainError::EventNotFound(_) | DomainError::EventNameNotFound(_) => {
                (StatusCode::NOT_FOUND, "event_not_found")
            }
            DomainError::InsufficientInventory { .. } => {
                (StatusCode::BAD_REQUEST, "insufficient_inventory")
            }
            DomainError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            DomainError::StorageTimeout(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_timeout")
            }
        };

        if status.is_server_error() {
            error!(error = %self.0, retryable = self.0.is_retryable(), "request failed");
        }

        let (remaining, requested) = match &self.0 {
            DomainError::InsufficientInventory {
                remaining,
                requested,
                ..
            } => (Some(*remaining), Some(*requested)),
            _ => (None, None),
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
            remaining,
            requested,
        };

        (status, Json(body)).into_response()
    }
}
