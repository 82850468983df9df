//! The concurrency-safe event collection.
//!
//! Events live in a [`HashMap`] behind a [`tokio::sync::RwLock`]. Every
//! critical section is a plain map operation with no await point inside
//! it, so once an operation holds the lock it runs to completion.
//!
//! Range queries return owned snapshots in map iteration order, which is
//! unspecified. Callers must not rely on any ordering.

use std::collections::HashMap;

use calendar_types::{Event, EventId};
use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::error::StoreError;

/// In-memory store of calendar events keyed by id.
#[derive(Debug, Default)]
pub struct EventStore {
    events: RwLock<HashMap<EventId, Event>>,
}

impl EventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new event.
    ///
    /// Fails with [`StoreError::DuplicateId`] if the id is already present,
    /// in which case the stored event is left untouched.
    pub async fn create(&self, event: Event) -> Result<(), StoreError> {
        let mut events = self.events.write().await;
        if events.contains_key(&event.id) {
            return Err(StoreError::DuplicateId(event.id));
        }
        events.insert(event.id, event);
        Ok(())
    }

    /// Replace the stored event that has the same id.
    ///
    /// This is a full replace. Fails with [`StoreError::NotFound`] if the id
    /// is absent.
    pub async fn update(&self, event: Event) -> Result<(), StoreError> {
        let mut events = self.events.write().await;
        match events.get_mut(&event.id) {
            Some(slot) => {
                *slot = event;
                Ok(())
            }
            None => Err(StoreError::NotFound(event.id)),
        }
    }

    /// Remove an event by id.
    pub async fn delete(&self, id: EventId) -> Result<(), StoreError> {
        self.events
            .write()
            .await
            .remove(&id)
            .map(drop)
            .ok_or(StoreError::NotFound(id))
    }

    /// Look up a single event by id.
    pub async fn get(&self, id: EventId) -> Result<Event, StoreError> {
        self.events
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Number of stored events.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Whether the store holds no events.
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Events whose date falls on `day`.
    ///
    /// The calendar day of an event is read in the offset the caller
    /// supplied with it, so `2024-01-02T23:30:00-05:00` is on January 2.
    pub async fn events_for_day(&self, day: NaiveDate) -> Vec<Event> {
        self.collect(|event| event.date.date_naive() == day).await
    }

    /// Events strictly between `week_start` and `week_start + 7 days`.
    ///
    /// Both boundaries are exclusive: an event dated exactly at
    /// `week_start` is not returned.
    pub async fn events_for_week(&self, week_start: DateTime<Utc>) -> Vec<Event> {
        let week_end = week_start.checked_add_days(Days::new(7));
        self.collect_between(week_start, week_end).await
    }

    /// Events strictly between `month_start` and the same instant one month
    /// later.
    ///
    /// `month_start` is expected to be the first instant of a month (see
    /// [`period::month_start`](crate::period::month_start)). Both boundaries
    /// are exclusive.
    pub async fn events_for_month(&self, month_start: DateTime<Utc>) -> Vec<Event> {
        let month_end = month_start.checked_add_months(Months::new(1));
        self.collect_between(month_start, month_end).await
    }

    /// Open interval `(start, end)`; a missing `end` means the upper bound
    /// fell outside the representable range.
    async fn collect_between(
        &self,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> Vec<Event> {
        self.collect(|event| {
            let date = event.date.to_utc();
            date > start && end.is_none_or(|end| date < end)
        })
        .await
    }

    async fn collect<F>(&self, keep: F) -> Vec<Event>
    where
        F: Fn(&Event) -> bool,
    {
        self.events
            .read()
            .await
            .values()
            .filter(|event| keep(event))
            .cloned()
            .collect()
    }
}
