//! Service-request handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use homehaven_core::model::{NewServiceRequest, ServiceRequest};
use homehaven_core::policy::AgeCategory;
use homehaven_core::repo::RequestUpdateOutcome;
use homehaven_core::types::{RequestId, UserId};

use crate::error::AppError;
use crate::state::AppState;

/// `GET /users/{uid}/requests` - request history, newest first.
pub async fn list(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<Vec<ServiceRequest>>, AppError> {
    Ok(Json(state.facade().list_requests(&UserId::new(uid))?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
    #[serde(flatten)]
    request: NewServiceRequest,
    /// Self-reported age; absent means unknown.
    reported_age: Option<f64>,
}

/// `POST /users/{uid}/requests` - submit a request through the policy gate.
pub async fn create(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<ServiceRequest>), AppError> {
    let age_category = body
        .reported_age
        .map_or(AgeCategory::Unknown, AgeCategory::from_age);
    let row = state
        .facade()
        .create_request(&UserId::new(uid), body.request, age_category)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `PATCH /users/{uid}/requests/{request_id}` - user edit of a pending
/// request. Only `notes` and `cancelRequested` are accepted.
pub async fn update(
    State(state): State<AppState>,
    Path((uid, request_id)): Path<(String, String)>,
    Json(updates): Json<Map<String, Value>>,
) -> Result<Json<ServiceRequest>, AppError> {
    if updates.is_empty() {
        return Err(AppError::BadRequest(
            "request edit body must name at least one field".to_owned(),
        ));
    }
    let outcome = state.facade().update_request_by_user(
        &UserId::new(uid),
        &RequestId::new(&request_id),
        &updates,
    )?;
    match outcome {
        RequestUpdateOutcome::Updated(row) => Ok(Json(row)),
        RequestUpdateOutcome::NotFound => {
            Err(AppError::NotFound(format!("request \"{request_id}\"")))
        }
        RequestUpdateOutcome::ForbiddenFieldsOrState => Err(AppError::Conflict(
            "only notes and cancelRequested may change, and only while pending".to_owned(),
        )),
    }
}
