//! `SQLite` implementation of the `InventoryStore` trait.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tokio::time::Instant;
use tracing::{debug, error, info, instrument};

use tigertix_core::error::DomainError;
use tigertix_core::event::{Event, NewEvent, PurchaseRecord, validate_quantity};
use tigertix_core::store::{Clock, InventoryStore, Purchase};

use crate::config::StoreConfig;
use crate::locks::EventLocks;
use crate::schema::MIGRATIONS;
use crate::transaction::{bounded, bounded_until, storage_error, with_transaction};

const EVENT_COLUMNS: &str = "id, name, date, ticket_count, created_at";

/// Conditional decrement: matches no row when the event is missing or short.
const DECREMENT_TICKETS: &str = r"
UPDATE events
   SET ticket_count = ticket_count - ?1
 WHERE id = ?2 AND ticket_count >= ?1
RETURNING id, name, date, ticket_count, created_at
";

#[derive(Debug, FromRow)]
struct EventRow {
    id: i64,
    name: String,
    date: String,
    ticket_count: i64,
    created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            date: row.date,
            ticket_count: row.ticket_count,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PurchaseRow {
    id: i64,
    event_id: i64,
    user_id: i64,
    quantity: i64,
    purchased_at: DateTime<Utc>,
}

impl From<PurchaseRow> for PurchaseRecord {
    fn from(row: PurchaseRow) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            user_id: row.user_id,
            quantity: row.quantity,
            purchased_at: row.purchased_at,
        }
    }
}

/// Fixed-width timestamps so text ordering matches time ordering.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// SQLite-backed inventory store.
///
/// Cheap to clone; clones share the pool, the lock registry, and the clock.
#[derive(Clone)]
pub struct SqliteInventoryStore {
    pool: SqlitePool,
    locks: Arc<EventLocks>,
    clock: Arc<dyn Clock>,
    transaction_timeout: Duration,
}

impl std::fmt::Debug for SqliteInventoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteInventoryStore")
            .field("pool", &self.pool)
            .field("locks", &self.locks)
            .field("transaction_timeout", &self.transaction_timeout)
            .finish_non_exhaustive()
    }
}

impl SqliteInventoryStore {
    /// Opens a connection pool for `config`. The database file is created if
    /// it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the URL is malformed or the database cannot
    /// be opened.
    pub async fn connect(config: &StoreConfig, clock: Arc<dyn Clock>) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        info!(
            max_connections = config.max_connections,
            transaction_timeout_ms = config.transaction_timeout.as_millis(),
            "inventory store connected"
        );

        Ok(Self::from_pool(pool, clock, config.transaction_timeout))
    }

    /// Wraps an existing pool.
    #[must_use]
    pub fn from_pool(pool: SqlitePool, clock: Arc<dyn Clock>, transaction_timeout: Duration) -> Self {
        Self {
            pool,
            locks: Arc::new(EventLocks::new()),
            clock,
            transaction_timeout,
        }
    }

    /// Creates the tables if they are missing.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if a schema statement fails.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        for statement in MIGRATIONS {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        debug!("inventory schema applied");
        Ok(())
    }

    /// The underlying pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes every pooled connection. Further calls fail with a storage error.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("inventory store closed");
    }

    /// Serializes on the event's lock, then runs the decrement transaction.
    /// The lock wait and the transaction share one deadline.
    async fn purchase_serialized(&self, purchase: Purchase) -> Result<Event, DomainError> {
        let budget = self.transaction_timeout;
        let deadline = Instant::now() + budget;
        let _guard = bounded_until(deadline, budget, async {
            Ok(self.locks.acquire(purchase.event_id).await)
        })
        .await?;

        let purchased_at = self.clock.now();
        with_transaction(&self.pool, deadline, budget, move |conn| {
            Box::pin(decrement_tickets(conn, purchase, purchased_at))
        })
        .await
    }
}

/// Check-and-decrement for one purchase. Runs inside a transaction.
async fn decrement_tickets(
    conn: &mut SqliteConnection,
    purchase: Purchase,
    purchased_at: DateTime<Utc>,
) -> Result<Event, DomainError> {
    let updated: Option<EventRow> = sqlx::query_as(DECREMENT_TICKETS)
        .bind(purchase.quantity)
        .bind(purchase.event_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(storage_error("decrement ticket count"))?;

    let Some(row) = updated else {
        let remaining: Option<i64> =
            sqlx::query_scalar("SELECT ticket_count FROM events WHERE id = ?1")
                .bind(purchase.event_id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(storage_error("read ticket count"))?;

        return Err(match remaining {
            None => DomainError::EventNotFound(purchase.event_id),
            Some(remaining) => DomainError::InsufficientInventory {
                event_id: purchase.event_id,
                requested: purchase.quantity,
                remaining,
            },
        });
    };

    if let Some(user_id) = purchase.user_id {
        sqlx::query(
            "INSERT INTO purchases (event_id, user_id, quantity, purchased_at) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(purchase.event_id)
        .bind(user_id)
        .bind(purchase.quantity)
        .bind(timestamp(purchased_at))
        .execute(&mut *conn)
        .await
        .map_err(storage_error("record purchase"))?;
    }

    Ok(row.into())
}

#[async_trait]
impl InventoryStore for SqliteInventoryStore {
    #[instrument(skip(self, new_event), fields(name = %new_event.name))]
    async fn create(&self, new_event: &NewEvent) -> Result<i64, DomainError> {
        new_event.validate()?;

        let created_at = timestamp(self.clock.now());
        let result = bounded(self.transaction_timeout, async {
            sqlx::query(
                "INSERT INTO events (name, date, ticket_count, created_at) \
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(new_event.name.trim())
            .bind(new_event.date.trim())
            .bind(new_event.ticket_count)
            .bind(created_at.as_str())
            .execute(&self.pool)
            .await
            .map_err(storage_error("insert event"))
        })
        .await?;

        let event_id = result.last_insert_rowid();
        info!(event_id, ticket_count = new_event.ticket_count, "event created");
        Ok(event_id)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Event>, DomainError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC, id DESC");
        let rows: Vec<EventRow> = bounded(self.transaction_timeout, async {
            sqlx::query_as(&sql)
                .fetch_all(&self.pool)
                .await
                .map_err(storage_error("list events"))
        })
        .await?;

        debug!(count = rows.len(), "listed events");
        Ok(rows.into_iter().map(Event::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_available(&self) -> Result<Vec<Event>, DomainError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE ticket_count > 0 ORDER BY date ASC, id ASC"
        );
        let rows: Vec<EventRow> = bounded(self.transaction_timeout, async {
            sqlx::query_as(&sql)
                .fetch_all(&self.pool)
                .await
                .map_err(storage_error("list available events"))
        })
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    #[instrument(skip(self))]
    async fn get(&self, event_id: i64) -> Result<Option<Event>, DomainError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1");
        let row: Option<EventRow> = bounded(self.transaction_timeout, async {
            sqlx::query_as(&sql)
                .bind(event_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_error("fetch event"))
        })
        .await?;

        Ok(row.map(Event::from))
    }

    #[instrument(skip(self))]
    async fn remove(&self, event_id: i64) -> Result<bool, DomainError> {
        let result = bounded(self.transaction_timeout, async {
            sqlx::query("DELETE FROM events WHERE id = ?1")
                .bind(event_id)
                .execute(&self.pool)
                .await
                .map_err(storage_error("delete event"))
        })
        .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!("event removed");
        } else {
            debug!("no event to remove");
        }
        Ok(removed)
    }

    #[instrument(
        skip(self),
        fields(event_id = purchase.event_id, quantity = purchase.quantity)
    )]
    async fn purchase(&self, purchase: Purchase) -> Result<Event, DomainError> {
        validate_quantity(purchase.quantity)?;

        // Detached so an abandoned caller cannot cancel a half-run transaction.
        let store = self.clone();
        let outcome = tokio::spawn(async move { store.purchase_serialized(purchase).await })
            .await
            .map_err(|err| {
                error!(error = %err, "purchase task failed");
                DomainError::Storage("purchase did not complete".into())
            })?;

        match &outcome {
            Ok(event) => info!(remaining = event.ticket_count, "tickets purchased"),
            Err(err) => debug!(error = %err, "purchase rejected"),
        }
        outcome
    }

    #[instrument(skip(self))]
    async fn purchases_for_event(&self, event_id: i64) -> Result<Vec<PurchaseRecord>, DomainError> {
        let rows: Vec<PurchaseRow> = bounded(self.transaction_timeout, async {
            sqlx::query_as(
                "SELECT id, event_id, user_id, quantity, purchased_at \
                 FROM purchases WHERE event_id = ?1 ORDER BY id ASC",
            )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("list purchases"))
        })
        .await?;

        Ok(rows.into_iter().map(PurchaseRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_timestamp_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let fractional = whole + chrono::Duration::milliseconds(500);

        let a = timestamp(whole);
        let b = timestamp(fractional);

        assert_eq!(a, "2026-01-15T10:00:00.000000Z");
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }
}
