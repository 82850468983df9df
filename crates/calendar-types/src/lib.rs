//! Shared type definitions for the calendar service.
//!
//! This crate is the single source of truth for the records that flow
//! between the store and the HTTP layer.
//!
//! # Modules
//!
//! - [`event`] -- The calendar [`Event`] record and request payloads

pub mod event;

pub use event::{Event, EventId, EventIdRequest};
