//! The calendar event record.
//!
//! Events are identified by a caller-assigned integer id. The id is the
//! only key the store knows about; everything else is opaque payload.
//!
//! The event date keeps whatever UTC offset the caller supplied. It is
//! written back in RFC 3339 with `Z` for a zero offset.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize, Serializer};

/// Caller-assigned event identifier.
pub type EventId = i64;

/// A single calendar event.
///
/// On the wire this is a JSON object with the fields `id`, `name`, `date`
/// (RFC 3339) and an optional `description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier, assigned by the caller.
    pub id: EventId,
    /// Short human-readable title.
    pub name: String,
    /// The instant the event takes place, in the caller's offset.
    #[serde(serialize_with = "serialize_rfc3339")]
    pub date: DateTime<FixedOffset>,
    /// Free-form description. Empty when omitted by the caller.
    #[serde(default)]
    pub description: String,
}

impl Event {
    /// Create an event with an empty description.
    pub fn new(
        id: EventId,
        name: impl Into<String>,
        date: impl Into<DateTime<FixedOffset>>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            date: date.into(),
            description: String::new(),
        }
    }

    /// Attach a description, consuming and returning the event.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

fn serialize_rfc3339<S: Serializer>(
    date: &DateTime<FixedOffset>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Request body that names a single event by id (used by delete).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventIdRequest {
    /// The id of the targeted event.
    pub id: EventId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn description_defaults_to_empty() {
        let event: Event =
            serde_json::from_str(r#"{"id":1,"name":"standup","date":"2024-01-02T09:00:00Z"}"#)
                .unwrap();
        assert_eq!(event.id, 1);
        assert_eq!(event.name, "standup");
        assert_eq!(
            event.date.to_utc(),
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap()
        );
        assert!(event.description.is_empty());
    }

    #[test]
    fn utc_date_round_trips_with_z() {
        let event: Event =
            serde_json::from_str(r#"{"id":1,"name":"standup","date":"2024-01-02T09:00:00Z"}"#)
                .unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["date"], "2024-01-02T09:00:00Z");
        assert_eq!(json["description"], "");
    }

    #[test]
    fn offset_date_round_trips_unchanged() {
        let event: Event = serde_json::from_str(
            r#"{"id":2,"name":"late call","date":"2024-01-02T23:30:00-05:00"}"#,
        )
        .unwrap();
        assert_eq!(event.date.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(
            event.date.to_utc(),
            Utc.with_ymd_and_hms(2024, 1, 3, 4, 30, 0).unwrap()
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["date"], "2024-01-02T23:30:00-05:00");
    }

    #[test]
    fn fractional_seconds_are_kept() {
        let event: Event = serde_json::from_str(
            r#"{"id":3,"name":"tick","date":"2024-01-02T09:00:00.250+02:00"}"#,
        )
        .unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["date"], "2024-01-02T09:00:00.250+02:00");
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let result = serde_json::from_str::<Event>(r#"{"id":1,"date":"2024-01-02T09:00:00Z"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn non_integer_id_is_rejected() {
        let result = serde_json::from_str::<EventIdRequest>(r#"{"id":"one"}"#);
        assert!(result.is_err());
    }
}
