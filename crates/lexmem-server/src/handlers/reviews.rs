//! Review submission endpoint

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Json;
use serde::Deserialize;
use serde_json::json;

use lexmem_core::ReviewType;

use crate::state::AppState;

use super::{storage_error, user_id, ApiResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    pub word_id: String,
    pub result: bool,
    pub review_type: ReviewType,
}

/// Record an answered quiz. The review row and the word's aggregates
/// are written in one transaction by the storage layer.
pub async fn submit_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SubmitReviewRequest>,
) -> ApiResult {
    let user_id = user_id(&headers)?;

    let review = state
        .storage
        .record_review(&user_id, &req.word_id, req.result, req.review_type)
        .map_err(storage_error)?;

    Ok(Json(json!({ "success": true, "review": review })))
}
