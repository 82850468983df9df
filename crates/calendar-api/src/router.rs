//! Axum router construction for the calendar API.
//!
//! Assembles all endpoints into a single [`Router`] wrapped by the request
//! logging middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{MethodRouter, get, post};

use crate::handlers;
use crate::middleware::log_request;
use crate::state::AppState;

/// Build the complete Axum router for the calendar service.
///
/// The router includes:
/// - `POST /create_event/`
/// - `POST /update_event/`
/// - `POST /delete_event/`
/// - `GET /events_for_day/`
/// - `GET /events_for_week/`
/// - `GET /events_for_month/`
///
/// Each path is also reachable without the trailing slash. Any other method
/// on these paths yields `405`, any other path `404`, both as JSON error
/// envelopes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let router = Router::new();
    let router = endpoint(router, "/create_event/", post(handlers::create_event));
    let router = endpoint(router, "/update_event/", post(handlers::update_event));
    let router = endpoint(router, "/delete_event/", post(handlers::delete_event));
    let router = endpoint(router, "/events_for_day/", get(handlers::events_for_day));
    let router = endpoint(router, "/events_for_week/", get(handlers::events_for_week));
    let router = endpoint(router, "/events_for_month/", get(handlers::events_for_month));

    router
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn(log_request))
        .with_state(state)
}

/// Register `path` with and without its trailing slash.
fn endpoint(
    router: Router<Arc<AppState>>,
    path: &str,
    method: MethodRouter<Arc<AppState>>,
) -> Router<Arc<AppState>> {
    let method = method.fallback(handlers::method_not_allowed);
    router
        .route(path.trim_end_matches('/'), method.clone())
        .route(path, method)
}
