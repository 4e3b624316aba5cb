//! Homehaven Web - HTTP API surface over the data core.
//!
//! Serves the JSON API on port 3000 by default. Storage is the durable
//! JSON-file store when `HH_DATA_DIR` is set, otherwise in-memory; on first
//! start the content catalog is seeded from `HH_CONTENT_FILE` or the bundled
//! starter catalog.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use homehaven_core::store::{CollectionStore, JsonFileStore, MemoryStore};
use homehaven_web::config::WebConfig;
use homehaven_web::state::AppState;

/// Starter catalog used when `HH_CONTENT_FILE` is not set.
const DEFAULT_CONTENT: &str = include_str!("../data/default-content.json");

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = WebConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "homehaven_web=info,homehaven_core=info,tower_http=debug".into());

    // JSON logs when HH_LOG_JSON is set (for log shippers), text locally
    let use_json = std::env::var("HH_LOG_JSON").is_ok();
    let json_layer = use_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!use_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    // Open the collection store
    let store: Arc<dyn CollectionStore> = match &config.data_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "using durable JSON-file store");
            Arc::new(JsonFileStore::open(dir).expect("Failed to open data directory"))
        }
        None => {
            tracing::info!("no HH_DATA_DIR set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    // Build application state and seed the catalog on first start
    let state = AppState::new(store, config.policy_context());
    let content_file = config.content_file.clone();
    let seeded = state
        .facade()
        .bootstrap(|| async move {
            let body = match content_file {
                Some(path) => tokio::fs::read_to_string(path).await?,
                None => DEFAULT_CONTENT.to_owned(),
            };
            Ok(serde_json::from_str(&body)?)
        })
        .await
        .expect("Failed to bootstrap collections");
    if seeded > 0 {
        tracing::info!(records = seeded, "seeded content catalog");
    }

    // Start server
    let app = homehaven_web::app(state);
    let addr = config.socket_addr();
    tracing::info!("homehaven-web listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
