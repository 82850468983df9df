//! Error types for the event store.

use calendar_types::EventId;

/// Business-rule violations reported by [`EventStore`](crate::EventStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// An event with this id is already stored.
    #[error("event with id {0} already exists")]
    DuplicateId(EventId),

    /// No event with this id is stored.
    #[error("event with id {0} not found")]
    NotFound(EventId),
}
