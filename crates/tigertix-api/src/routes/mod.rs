//! Route modules, one per TigerTix service surface.

pub mod admin;
pub mod booking;
pub mod client;
pub mod health;
