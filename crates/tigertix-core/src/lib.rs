//! TigerTix Core: shared domain types.
//!
//! This crate defines the event model, the error taxonomy, and the
//! `InventoryStore` contract that every ticketing caller goes through. It
//! contains no infrastructure code.

pub mod error;
pub mod event;
pub mod store;
