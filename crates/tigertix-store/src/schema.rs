//! Inventory database schema.

/// SQL to create the events table.
pub const CREATE_EVENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS events (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL,
    date         TEXT NOT NULL,
    ticket_count INTEGER NOT NULL DEFAULT 0 CHECK (ticket_count >= 0),
    created_at   TEXT NOT NULL
)
";

/// SQL to create the append-only purchase log.
pub const CREATE_PURCHASES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS purchases (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    event_id     INTEGER NOT NULL REFERENCES events (id) ON DELETE CASCADE,
    user_id      INTEGER NOT NULL,
    quantity     INTEGER NOT NULL CHECK (quantity > 0),
    purchased_at TEXT NOT NULL
)
";

/// SQL to index purchases by event.
pub const CREATE_PURCHASES_EVENT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_purchases_event_id
    ON purchases (event_id, id)
";

/// Statements applied, in order, by `SqliteInventoryStore::migrate`.
pub const MIGRATIONS: &[&str] = &[
    CREATE_EVENTS_TABLE,
    CREATE_PURCHASES_TABLE,
    CREATE_PURCHASES_EVENT_INDEX,
];
