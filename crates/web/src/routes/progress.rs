//! Progress handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use homehaven_core::model::ContentProgress;
use homehaven_core::repo::ProgressWrite;
use homehaven_core::resolver::ContinueWatching;
use homehaven_core::types::{ContentId, UserId};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaBody {
    content_id: String,
    delta_seconds: f64,
}

/// `POST /users/{uid}/progress` - delta write, clamped at zero.
pub async fn add_delta(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(body): Json<DeltaBody>,
) -> Result<Json<ContentProgress>, AppError> {
    let row = state.facade().add_progress(
        &UserId::new(uid),
        &ContentId::new(body.content_id),
        body.delta_seconds,
    )?;
    Ok(Json(row))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsoluteBody {
    content_id: String,
    progress_seconds: f64,
    #[serde(default)]
    allow_restart: bool,
}

/// `PUT /users/{uid}/progress` - absolute write. A blocked regression is a
/// `200` with the `regression_blocked` outcome, not an error.
pub async fn set_absolute(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(body): Json<AbsoluteBody>,
) -> Result<Json<ProgressWrite>, AppError> {
    let outcome = state.facade().set_progress(
        &UserId::new(uid),
        &ContentId::new(body.content_id),
        body.progress_seconds,
        body.allow_restart,
    )?;
    Ok(Json(outcome))
}

/// `GET /users/{uid}/continue-watching` - resume state.
pub async fn continue_watching(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<ContinueWatching>, AppError> {
    Ok(Json(state.facade().continue_watching(&UserId::new(uid))?))
}
