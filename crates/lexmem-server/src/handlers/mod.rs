//! Request Handlers
//!
//! Identity extraction, the JSON error envelope, and the per-resource
//! handler modules.

pub mod reviews;
pub mod sessions;
pub mod words;

use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use serde_json::{json, Value};

use lexmem_core::StorageError;

/// Error response: status plus a JSON envelope.
pub type ApiError = (StatusCode, Json<Value>);

/// Handler result type.
pub type ApiResult = Result<Json<Value>, ApiError>;

/// Build a JSON error envelope.
pub fn error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

/// Map a storage failure onto an HTTP status.
pub fn storage_error(err: StorageError) -> ApiError {
    match err {
        StorageError::NotFound(_) => error(StatusCode::NOT_FOUND, "not found"),
        StorageError::Forbidden(_) => error(StatusCode::FORBIDDEN, "forbidden"),
        StorageError::Invalid(message) => error(StatusCode::BAD_REQUEST, &message),
        err => {
            tracing::error!(error = %err, "storage failure");
            error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

/// Caller identity from the `X-User-Id` header.
///
/// Real authentication is out of scope; the header must at least be a
/// well-formed UUID so identities can't collide by accident.
pub fn user_id(headers: &HeaderMap) -> Result<String, ApiError> {
    let raw = headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "missing X-User-Id header"))?;

    uuid::Uuid::parse_str(raw)
        .map_err(|_| error(StatusCode::BAD_REQUEST, "X-User-Id must be a UUID"))?;

    Ok(raw.to_string())
}

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": lexmem_core::VERSION }))
}

// ============================================================================
// TESTS
// ============================================================================
