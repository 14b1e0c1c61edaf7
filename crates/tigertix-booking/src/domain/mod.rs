//! Booking commands and event-name matching.

pub mod commands;
pub mod matching;
