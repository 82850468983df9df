//! Request logging middleware.
//!
//! [`log_request`] wraps every route (fallbacks included). It records when
//! the request arrived, runs the rest of the stack, and then emits exactly
//! one `info` event with the method, URI, arrival time and elapsed time.
//! It never inspects or alters the response.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use tracing::info;

/// Log method, URI, arrival timestamp and processing time for a request.
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let received_at = Utc::now();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        %method,
        %uri,
        received_at = %received_at.to_rfc3339(),
        elapsed = ?started.elapsed(),
        "request handled"
    );

    response
}
