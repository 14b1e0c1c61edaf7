//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tigertix_store::StoreConfig;
use tower_http::cors::CorsLayer;
use tigertix_store::config::{DEFAULT_MAX_CONNECTIONS, DEFAULT_TRANSACTION_TIMEOUT};

use crate::error::AppError;

const DEFAULT_DATABASE_URL: &str = "sqlite://tigertix.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Settings resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Inventory store settings.
    pub store: StoreConfig,
    /// Browser origin allowed to call the API; any origin when unset.
    pub cors_origin: Option<String>,
}

impl Config {
    /// Reads `DATABASE_URL`, `HOST`, `PORT`, `DB_MAX_CONNECTIONS`,
    /// `TRANSACTION_TIMEOUT_MS`, and `CORS_ALLOWED_ORIGIN` from the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but unparsable.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a value is set but unparsable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let cors_origin = lookup("CORS_ALLOWED_ORIGIN").filter(|origin| !origin.trim().is_empty());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let timeout_ms = parse_or(
            &lookup,
            "TRANSACTION_TIMEOUT_MS",
            u64::try_from(DEFAULT_TRANSACTION_TIMEOUT.as_millis()).unwrap_or(u64::MAX),
        )?;

        if max_connections == 0 {
            return Err(AppError::Config("DB_MAX_CONNECTIONS must be at least 1".into()));
        }
        if timeout_ms == 0 {
            return Err(AppError::Config(
                "TRANSACTION_TIMEOUT_MS must be at least 1".into(),
            ));
        }

        let timeout = Duration::from_millis(timeout_ms);
        let store = StoreConfig::new(database_url)
            .with_max_connections(max_connections)
            .with_transaction_timeout(timeout)
            .with_busy_timeout(timeout);

        Ok(Self {
            host,
            port,
            store,
            cors_origin,
        })
    }

    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a valid address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }

    /// CORS policy for the configured origin.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the origin is not a valid header value.
    pub fn cors_layer(&self) -> Result<CorsLayer, AppError> {
        let Some(origin) = &self.cors_origin else {
            return Ok(CorsLayer::permissive());
        };
        let origin = HeaderValue::from_str(origin.trim())
            .map_err(|e| AppError::Config(format!("CORS_ALLOWED_ORIGIN is invalid: {e}")))?;

        Ok(CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]))
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
        None => Ok(default),
    }
}
