//! Error types for the calendar API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. The
//! response body is always the error envelope `{"error": message}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use calendar_store::StoreError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request payload or query string could not be decoded.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The endpoint exists but not for this HTTP method.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// No endpoint matches the request path.
    #[error("not found: {0}")]
    NotFound(String),

    /// The store rejected the operation (duplicate or missing id).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The response body could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// The HTTP status this error is reported with.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
