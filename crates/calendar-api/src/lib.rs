//! HTTP API for the calendar event service.
//!
//! This crate provides an Axum HTTP server that exposes the event store
//! through six endpoints:
//!
//! - **Writes** (`POST`): `/create_event/`, `/update_event/`, `/delete_event/`
//! - **Range reads** (`GET`): `/events_for_day/`, `/events_for_week/`,
//!   `/events_for_month/`
//!
//! Every response is a single JSON document, either `{"result": ...}` or
//! `{"error": "..."}`. Business-rule failures map to `503`, malformed input
//! to `400`, a wrong method to `405`, and serialization failures to `500`.
//!
//! # Architecture
//!
//! One [`EventStore`](calendar_store::EventStore) is created at startup and
//! shared by all handlers through [`AppState`]. Each request passes through
//! the logging middleware, then its handler, then the store.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{SHUTDOWN_GRACE, ServerConfig, ServerError, bind, run, shutdown_signal};
pub use state::AppState;
