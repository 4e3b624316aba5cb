//! Saved-content handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use homehaven_core::model::SavedContent;
use homehaven_core::resolver::SavedItem;
use homehaven_core::types::{ContentId, SavedContentId, UserId};

use crate::error::AppError;
use crate::state::AppState;

/// `GET /users/{uid}/saved` - saved rows joined to the catalog, orphans
/// tagged.
pub async fn list(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<Vec<SavedItem>>, AppError> {
    Ok(Json(state.facade().list_saved(&UserId::new(uid))?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBody {
    content_id: String,
}

/// `POST /users/{uid}/saved` - save a content item (idempotent).
pub async fn save(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(body): Json<SaveBody>,
) -> Result<(StatusCode, Json<SavedContent>), AppError> {
    let row = state
        .facade()
        .save_content(&UserId::new(uid), &ContentId::new(body.content_id))?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `DELETE /users/{uid}/saved/{saved_id}` - remove a saved row.
pub async fn remove(
    State(state): State<AppState>,
    Path((uid, saved_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let removed = state
        .facade()
        .unsave_content(&UserId::new(uid), &SavedContentId::new(&saved_id))?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("saved row \"{saved_id}\"")))
    }
}

/// `GET /users/{uid}/saved-status/{content_id}` - saved yes/no.
pub async fn status(
    State(state): State<AppState>,
    Path((uid, content_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let saved = state
        .facade()
        .is_saved(&UserId::new(uid), &ContentId::new(content_id))?;
    Ok(Json(json!({ "saved": saved })))
}
