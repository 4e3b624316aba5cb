//! HTTP route handlers for the web surface.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                  - Health check
//!
//! # Session (demo identity)
//! GET    /session                                 - Current user
//! POST   /session/demo                            - Sign in the demo account
//! DELETE /session                                 - Sign out
//!
//! # Content catalog (public)
//! GET    /content                                 - Listing (category/subcategory/type filters)
//! GET    /content/suggested                       - Newest items (limit param)
//! GET    /content/{id}                            - Single item
//! GET    /policy/notice                           - Jurisdiction restriction notice
//!
//! # Saved content
//! GET    /users/{uid}/saved                       - Saved rows joined to the catalog
//! POST   /users/{uid}/saved                       - Save a content item
//! DELETE /users/{uid}/saved/{saved_id}            - Remove a saved row
//! GET    /users/{uid}/saved-status/{content_id}   - Saved yes/no for one item
//!
//! # Progress
//! POST   /users/{uid}/progress                    - Delta write
//! PUT    /users/{uid}/progress                    - Absolute write (regression-guarded)
//! GET    /users/{uid}/continue-watching           - Resume state
//!
//! # Service requests
//! GET    /users/{uid}/requests                    - Request history
//! POST   /users/{uid}/requests                    - Submit a request (policy-gated)
//! PATCH  /users/{uid}/requests/{id}               - User edit (notes/cancelRequested, pending only)
//!
//! # Account
//! GET    /users/{uid}/profile                     - Profile
//! PATCH  /users/{uid}/profile                     - Profile update
//! POST   /users/{uid}/consents                    - Parental-consent placeholder
//! POST   /users/{uid}/erasure                     - Account deletion (erasure cascade)
//! ```

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

pub mod account;
pub mod content;
pub mod progress;
pub mod requests;
pub mod saved;
pub mod session;

/// Assemble the full route table.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Session
        .route("/session", get(session::current).delete(session::sign_out))
        .route("/session/demo", post(session::sign_in_demo))
        // Content catalog
        .route("/content", get(content::list))
        .route("/content/suggested", get(content::suggested))
        .route("/content/{id}", get(content::get_by_id))
        .route("/policy/notice", get(content::policy_notice))
        // Saved content
        .route(
            "/users/{uid}/saved",
            get(saved::list).post(saved::save),
        )
        .route("/users/{uid}/saved/{saved_id}", delete(saved::remove))
        .route(
            "/users/{uid}/saved-status/{content_id}",
            get(saved::status),
        )
        // Progress
        .route(
            "/users/{uid}/progress",
            post(progress::add_delta).put(progress::set_absolute),
        )
        .route(
            "/users/{uid}/continue-watching",
            get(progress::continue_watching),
        )
        // Service requests
        .route(
            "/users/{uid}/requests",
            get(requests::list).post(requests::create),
        )
        .route(
            "/users/{uid}/requests/{request_id}",
            patch(requests::update),
        )
        // Account
        .route(
            "/users/{uid}/profile",
            get(account::profile).patch(account::update_profile),
        )
        .route("/users/{uid}/consents", post(account::create_consent))
        .route("/users/{uid}/erasure", post(account::request_erasure))
}
