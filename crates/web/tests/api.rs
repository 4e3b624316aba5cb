//! HTTP-level tests over the assembled router with an in-memory store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use homehaven_core::store::MemoryStore;
use homehaven_web::config::WebConfig;
use homehaven_web::state::AppState;

const DEMO_UID: &str = "demo-user-1";

async fn test_app() -> Router {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        WebConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            data_dir: None,
            content_file: None,
            jurisdiction: "NG".to_owned(),
            store_policy: "test policy".to_owned(),
            disabled_request_types: std::collections::HashSet::new(),
            consent_regions: std::collections::HashSet::new(),
        }
        .policy_context(),
    );
    state
        .facade()
        .bootstrap(|| async {
            Ok(vec![json!({
                "id": "content-1",
                "title": "Fix a leaky tap",
                "summary": "Replace a worn washer.",
                "category": "diy",
                "subcategory": "maintenance",
                "type": "video",
                "createdAt": "2025-02-11T08:00:00Z"
            })])
        })
        .await
        .unwrap();
    homehaven_web::app(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn send(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_content_listing_is_public() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/content?category=diy"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let rows = body_json(response).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);

    let response = app.oneshot(get("/content/content-missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_save_requires_session() {
    let app = test_app().await;
    let response = app
        .oneshot(send(
            "POST",
            &format!("/users/{DEMO_UID}/saved"),
            json!({ "contentId": "content-1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_save_flow_after_demo_sign_in() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(send("POST", "/session/demo", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            &format!("/users/{DEMO_UID}/saved"),
            json!({ "contentId": "content-1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // acting as another user is forbidden
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/users/somebody-else/saved",
            json!({ "contentId": "content-1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(get(&format!(
            "/users/{DEMO_UID}/saved-status/content-1"
        )))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, json!({ "saved": true }));
}

#[tokio::test]
async fn test_progress_regression_is_an_outcome_not_an_error() {
    let app = test_app().await;
    app.clone()
        .oneshot(send("POST", "/session/demo", json!({})))
        .await
        .unwrap();

    let uri = format!("/users/{DEMO_UID}/progress");
    let response = app
        .clone()
        .oneshot(send(
            "PUT",
            &uri,
            json!({ "contentId": "content-1", "progressSeconds": 50.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(send(
            "PUT",
            &uri,
            json!({ "contentId": "content-1", "progressSeconds": 10.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let outcome = body_json(response).await;
    assert_eq!(outcome["outcome"], json!("regression_blocked"));
    assert_eq!(outcome["currentSeconds"], json!(50.0));
}

#[tokio::test]
async fn test_request_edit_outside_allow_list_conflicts() {
    let app = test_app().await;
    app.clone()
        .oneshot(send("POST", "/session/demo", json!({})))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            &format!("/users/{DEMO_UID}/requests"),
            json!({ "type": "maid", "notes": "weekly cleaning" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let request_id = created["id"].as_str().unwrap().to_owned();

    let response = app
        .clone()
        .oneshot(send(
            "PATCH",
            &format!("/users/{DEMO_UID}/requests/{request_id}"),
            json!({ "status": "completed" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // an empty edit body is rejected outright
    let response = app
        .oneshot(send(
            "PATCH",
            &format!("/users/{DEMO_UID}/requests/{request_id}"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
