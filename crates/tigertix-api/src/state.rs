//! Shared application state.

use std::sync::Arc;

use tigertix_core::store::InventoryStore;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single owner of event rows.
    pub store: Arc<dyn InventoryStore>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }
}
