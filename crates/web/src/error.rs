//! Unified error handling for the web surface.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use homehaven_core::DataError;

/// Application-level error type for HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Data core operation failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Malformed request from the client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The edit is not allowed in the resource's current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Data(err) => match err {
                DataError::Validation(_) => StatusCode::BAD_REQUEST,
                DataError::Unauthenticated => StatusCode::UNAUTHORIZED,
                DataError::OwnershipMismatch { .. } => StatusCode::FORBIDDEN,
                DataError::NotFound(_) => StatusCode::NOT_FOUND,
                DataError::Policy(_) => StatusCode::UNPROCESSABLE_ENTITY,
                DataError::Store(_) | DataError::Bootstrap(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
