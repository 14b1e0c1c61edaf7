//! TigerTix booking context: command and query handlers over the inventory store.
//!
//! Responsible for event administration (create, list, remove), ticket
//! purchases from the client service, and confirmed bookings from the
//! booking assistant. Every ticket-count change goes through
//! `InventoryStore::purchase`.

pub mod application;
pub mod domain;
