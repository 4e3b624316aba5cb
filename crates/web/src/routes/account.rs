//! Profile and privacy handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use homehaven_core::model::{ParentalConsent, PrivacyErasureRequest, User};
use homehaven_core::repo::ProfileUpdate;
use homehaven_core::types::UserId;

use crate::error::AppError;
use crate::state::AppState;

/// `GET /users/{uid}/profile` - profile row.
pub async fn profile(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<User>, AppError> {
    state
        .facade()
        .get_profile(&UserId::new(&uid))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("user \"{uid}\"")))
}

/// `PATCH /users/{uid}/profile` - profile update (unknown fields rejected).
pub async fn update_profile(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>, AppError> {
    Ok(Json(
        state.facade().update_profile(&UserId::new(uid), &update)?,
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentBody {
    child_age: f64,
}

/// `POST /users/{uid}/consents` - record a parental-consent placeholder.
pub async fn create_consent(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(body): Json<ConsentBody>,
) -> Result<(StatusCode, Json<ParentalConsent>), AppError> {
    let row = state
        .facade()
        .create_parental_consent_placeholder(&UserId::new(uid), body.child_age)?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Debug, Deserialize)]
pub struct ErasureBody {
    reason: String,
}

/// `POST /users/{uid}/erasure` - account deletion with the erasure cascade.
pub async fn request_erasure(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(body): Json<ErasureBody>,
) -> Result<(StatusCode, Json<PrivacyErasureRequest>), AppError> {
    let row = state
        .facade()
        .request_account_deletion(&UserId::new(uid), &body.reason)?;
    Ok((StatusCode::ACCEPTED, Json(row)))
}
