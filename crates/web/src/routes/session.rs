//! Demo session handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::error::AppError;
use crate::state::AppState;

/// `GET /session` - the current identity, if any.
pub async fn current(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "user": state.facade().current_user() }))
}

/// `POST /session/demo` - sign in the demo account and ensure its profile
/// row exists.
pub async fn sign_in_demo(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let user = state.identity().sign_in_demo();
    let profile = state.facade().ensure_profile()?;
    tracing::info!(uid = %user.uid, "demo sign-in");
    Ok(Json(json!({ "user": user, "profile": profile })))
}

/// `DELETE /session` - sign out.
pub async fn sign_out(State(state): State<AppState>) -> StatusCode {
    state.identity().sign_out();
    StatusCode::NO_CONTENT
}
