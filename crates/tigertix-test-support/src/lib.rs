//! Shared test doubles and utilities for TigerTix.

mod clock;
mod store;

pub use clock::{FixedClock, SteppingClock, fixed_now};
pub use store::{FailingInventoryStore, InMemoryInventoryStore};
