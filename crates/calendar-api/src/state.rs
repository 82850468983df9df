//! Shared application state for the calendar API.
//!
//! [`AppState`] carries the one [`EventStore`] that all handlers share for
//! the lifetime of the process. Tests build their own isolated instances.

use std::sync::Arc;

use calendar_store::EventStore;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// The event store backing every endpoint.
    pub store: Arc<EventStore>,
}

impl AppState {
    /// Create application state around a fresh, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create application state around an existing store.
    pub const fn with_store(store: Arc<EventStore>) -> Self {
        Self { store }
    }
}
