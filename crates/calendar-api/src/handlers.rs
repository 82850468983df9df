//! REST API endpoint handlers for the calendar service.
//!
//! Handlers decode the request, call the shared
//! [`EventStore`](calendar_store::EventStore) and wrap the outcome in the
//! `{"result": ...}` envelope. Every failure is an [`ApiError`], which
//! renders the `{"error": ...}` envelope with the matching status code.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/create_event/` | Create an event (body: event) |
//! | `POST` | `/update_event/` | Replace an event (body: event) |
//! | `POST` | `/delete_event/` | Delete an event (body: `{"id": N}`) |
//! | `GET` | `/events_for_day/` | Events on the reference day |
//! | `GET` | `/events_for_week/` | Events in the reference week |
//! | `GET` | `/events_for_month/` | Events in the reference month |
//!
//! The range endpoints use the current UTC time as reference unless a
//! `?date=YYYY-MM-DD` query parameter is given.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::Uri;
use calendar_store::period;
use calendar_types::{Event, EventIdRequest};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the range endpoints.
#[derive(Debug, Default, serde::Deserialize)]
pub struct PeriodQuery {
    /// Reference day. Defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// POST /create_event/
// ---------------------------------------------------------------------------

/// Create a new event. Fails with `503` if the id is already taken.
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let event: Event = decode_body(&body)?;
    state.store.create(event.clone()).await?;
    result_envelope(&event)
}

// ---------------------------------------------------------------------------
// POST /update_event/
// ---------------------------------------------------------------------------

/// Replace an existing event. Fails with `503` if the id is unknown.
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let event: Event = decode_body(&body)?;
    state.store.update(event.clone()).await?;
    result_envelope(&event)
}

// ---------------------------------------------------------------------------
// POST /delete_event/
// ---------------------------------------------------------------------------

/// Delete an event by id and confirm with a human-readable message.
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let EventIdRequest { id } = decode_body(&body)?;
    state.store.delete(id).await?;
    result_envelope(&format!("event with id {id} deleted"))
}

// ---------------------------------------------------------------------------
// GET range queries
// ---------------------------------------------------------------------------

/// List events on the reference day.
pub async fn events_for_day(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let day = reference_day(query)?;
    let events = state.store.events_for_day(day).await;
    result_envelope(&events)
}

/// List events in the week (starting Sunday) containing the reference day.
pub async fn events_for_week(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let day = reference_day(query)?;
    let events = state
        .store
        .events_for_week(period::week_start(day))
        .await;
    result_envelope(&events)
}

/// List events in the month containing the reference day.
pub async fn events_for_month(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let day = reference_day(query)?;
    let events = state
        .store
        .events_for_month(period::month_start(day))
        .await;
    result_envelope(&events)
}

// ---------------------------------------------------------------------------
// Fallbacks
// ---------------------------------------------------------------------------

/// Answer a known path requested with the wrong method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Answer a path that matches no endpoint.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_owned())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Decode a JSON request body regardless of its declared content type.
fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidInput(e.to_string()))
}

/// Wrap a serializable value in the success envelope.
fn result_envelope<T: Serialize + ?Sized>(result: &T) -> Result<Json<Value>, ApiError> {
    let result = serde_json::to_value(result)?;
    Ok(Json(serde_json::json!({ "result": result })))
}

/// The `?date=` day, or today in UTC when absent.
fn reference_day(query: Result<Query<PeriodQuery>, QueryRejection>) -> Result<NaiveDate, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    Ok(params.date.unwrap_or_else(|| Utc::now().date_naive()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decode_body_rejects_garbage() {
        let err = decode_body::<Event>(b"not json").unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn envelope_wraps_string() {
        let Json(body) = result_envelope("done").unwrap();
        assert_eq!(body, serde_json::json!({ "result": "done" }));
    }

    #[test]
    fn explicit_date_wins_over_today() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let reference = reference_day(Ok(Query(PeriodQuery { date: Some(day) }))).unwrap();
        assert_eq!(reference, day);
    }
}
