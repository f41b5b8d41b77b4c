//! Word management endpoints

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use serde::Deserialize;
use serde_json::json;

use crate::explain;
use crate::state::AppState;

use super::{error, storage_error, user_id, ApiResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWordRequest {
    pub text: String,
    pub context: Option<String>,
}

/// Record a new word. Explanation generation is kicked off as a
/// detached task; the response never waits for it.
pub async fn create_word(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateWordRequest>,
) -> ApiResult {
    let user_id = user_id(&headers)?;

    let word = state
        .storage
        .create_word(&user_id, req.text.trim(), req.context)
        .map_err(storage_error)?;

    if let Some(explainer) = &state.explainer {
        explain::spawn_explain(state.storage.clone(), explainer.clone(), word.clone());
    }

    Ok(Json(json!({ "word": word })))
}

#[derive(Debug, Deserialize)]
pub struct ListWordsParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List the caller's words, newest first.
pub async fn list_words(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListWordsParams>,
) -> ApiResult {
    let user_id = user_id(&headers)?;
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let offset = params.offset.unwrap_or(0).max(0);

    let words = state
        .storage
        .list_words(&user_id, limit, offset)
        .map_err(storage_error)?;
    let total = state.storage.count_words(&user_id).map_err(storage_error)?;

    Ok(Json(json!({ "words": words, "total": total })))
}

/// Get one word together with its explanation, if one has arrived.
pub async fn get_word(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult {
    let user_id = user_id(&headers)?;

    let word = state
        .storage
        .get_word(&id, &user_id)
        .map_err(storage_error)?
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "word not found"))?;
    let explanation = state.storage.get_explanation(&id).map_err(storage_error)?;

    Ok(Json(json!({ "word": word, "explanation": explanation })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetConfidenceRequest {
    pub confidence: i64,
}

/// Update the caller's self-rated confidence for a word.
pub async fn set_confidence(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<SetConfidenceRequest>,
) -> ApiResult {
    let user_id = user_id(&headers)?;

    let word = state
        .storage
        .set_confidence(&id, &user_id, req.confidence)
        .map_err(storage_error)?;

    Ok(Json(json!({ "word": word })))
}

/// Delete a word and everything derived from it.
pub async fn delete_word(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult {
    let user_id = user_id(&headers)?;

    let deleted = state
        .storage
        .delete_word(&id, &user_id)
        .map_err(storage_error)?;
    if !deleted {
        return Err(error(StatusCode::NOT_FOUND, "word not found"));
    }

    Ok(Json(json!({ "deleted": true })))
}
