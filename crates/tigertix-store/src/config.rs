//! Store configuration.

use std::time::Duration;

/// Default upper bound on a single transaction.
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Default pool size.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection and timing settings for `SqliteInventoryStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// `SQLite` connection URL, e.g. `sqlite://tigertix.db`.
    pub database_url: String,
    /// Maximum pooled connections.
    pub max_connections: u32,
    /// Budget for one operation. A purchase's wait for its event lock and its
    /// transaction both count against it; an uncommitted transaction past
    /// it is rolled back.
    pub transaction_timeout: Duration,
    /// How long a connection waits on the `SQLite` writer lock before
    /// reporting busy.
    pub busy_timeout: Duration,
}

impl StoreConfig {
    /// Creates a config for `database_url` with default limits.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            transaction_timeout: DEFAULT_TRANSACTION_TIMEOUT,
            busy_timeout: DEFAULT_TRANSACTION_TIMEOUT,
        }
    }

    /// Sets the pool size.
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets the transaction timeout.
    #[must_use]
    pub fn with_transaction_timeout(mut self, timeout: Duration) -> Self {
        self.transaction_timeout = timeout;
        self
    }

    /// Sets the `SQLite` busy timeout.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}
