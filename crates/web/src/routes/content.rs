//! Content catalog handlers. All routes here are public.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use homehaven_core::model::Content;
use homehaven_core::repo::ContentFilter;
use homehaven_core::types::ContentId;

use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_SUGGESTED_LIMIT: usize = 4;

/// `GET /content` - catalog listing, newest first, with optional
/// `category`/`subcategory`/`type` filters.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ContentFilter>,
) -> Result<Json<Vec<Content>>, AppError> {
    Ok(Json(state.facade().list_content(&filter)?))
}

#[derive(Debug, Deserialize)]
pub struct SuggestedParams {
    limit: Option<usize>,
}

/// `GET /content/suggested` - the newest catalog items.
pub async fn suggested(
    State(state): State<AppState>,
    Query(params): Query<SuggestedParams>,
) -> Result<Json<Vec<Content>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_SUGGESTED_LIMIT);
    Ok(Json(state.facade().list_suggested(limit)?))
}

/// `GET /content/{id}` - one catalog item.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Content>, AppError> {
    state
        .facade()
        .get_content(&ContentId::new(&id))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("content \"{id}\"")))
}

/// `GET /policy/notice` - jurisdiction restriction notice, if any.
pub async fn policy_notice(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "notice": state.facade().policy().restriction_notice() }))
}
