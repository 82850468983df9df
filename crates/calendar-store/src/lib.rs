//! In-memory event store for the calendar service.
//!
//! [`EventStore`] is the single source of truth for events. It is an
//! explicit object: construct one at startup and hand an [`Arc`] of it to
//! every consumer. Writes are serialized behind a reader/writer lock while
//! lookups and range queries run concurrently.
//!
//! The store never logs. Business-rule violations surface as
//! [`StoreError`] and it is up to the caller to translate them.
//!
//! [`Arc`]: std::sync::Arc

pub mod error;
pub mod period;
pub mod store;

pub use error::StoreError;
pub use store::EventStore;
