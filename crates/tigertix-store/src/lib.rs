//! TigerTix Store: SQLite persistence for ticketed events.
//!
//! The store owns the `events` and `purchases` tables. Ticket counts change
//! only through `SqliteInventoryStore::purchase`, which serializes writers
//! per event and runs inside a bounded transaction.

pub mod config;
pub mod locks;
pub mod schema;
pub mod sqlite_inventory_store;
mod transaction;

pub use config::StoreConfig;
pub use sqlite_inventory_store::SqliteInventoryStore;
