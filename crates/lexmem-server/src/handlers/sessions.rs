//! Study session endpoints
//!
//! Starting a session rebuilds the caller's queue and assembles a fresh
//! session; current/advance only touch the registry.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use serde_json::json;

use lexmem_core::{build_session, rebuild_queue, Session, SessionItem};

use crate::state::AppState;

use super::{error, storage_error, user_id, ApiError, ApiResult};

/// Rebuild the queue, assemble a session, and store it for the sitting.
pub async fn start_session(State(state): State<AppState>, headers: HeaderMap) -> ApiResult {
    let user_id = user_id(&headers)?;

    rebuild_queue(&state.storage, &user_id).map_err(storage_error)?;
    let session = build_session(&state.storage, &user_id).map_err(storage_error)?;

    let items = session.items().to_vec();
    let total = items.len();
    let session_id = state.sessions.insert(session);

    tracing::info!(%user_id, %session_id, total, "session started");

    Ok(Json(json!({
        "sessionId": session_id,
        "items": items,
        "total": total,
    })))
}

/// Look up a session, enforcing ownership, and run `f` on it.
fn with_owned_session<T>(
    state: &AppState,
    session_id: &str,
    user_id: &str,
    f: impl FnOnce(&mut Session) -> T,
) -> Result<T, ApiError> {
    state
        .sessions
        .with_session(session_id, |session| {
            if session.user_id() != user_id {
                return Err(error(
                    StatusCode::FORBIDDEN,
                    "session does not belong to user",
                ));
            }
            Ok(f(session))
        })
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "session not found"))?
}

/// The item under the session cursor, or `{"done": true}` once the
/// session is finished. Never an error on a done session.
pub async fn current_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult {
    let user_id = user_id(&headers)?;

    let current: Option<SessionItem> =
        with_owned_session(&state, &id, &user_id, |session| session.current().cloned())?;

    match current {
        Some(item) => Ok(Json(json!({ "done": false, "item": item }))),
        None => Ok(Json(json!({ "done": true }))),
    }
}

/// Move the session cursor forward. Advancing a finished session is a
/// no-op, not an error.
pub async fn advance_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult {
    let user_id = user_id(&headers)?;

    let (position, done) = with_owned_session(&state, &id, &user_id, |session| {
        session.advance();
        (session.position(), session.done())
    })?;

    Ok(Json(json!({ "position": position, "done": done })))
}
