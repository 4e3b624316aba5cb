//! Integration tests for Homehaven.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p homehaven-integration-tests
//! ```
//!
//! Everything runs against the in-memory store; no external services.
//!
//! # Test Categories
//!
//! - `data_core` - End-to-end facade behavior (saves, progress, requests,
//!   policy, erasure)
//! - `tracking` - Progress flush controller driven over the facade

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use serde_json::{Value, json};

use homehaven_core::DataFacade;
use homehaven_core::identity::StaticIdentity;
use homehaven_core::policy::PolicyContext;
use homehaven_core::store::MemoryStore;
use homehaven_core::types::UserId;

/// A facade over a fresh in-memory store with a seeded catalog, signed in
/// as one fixed user.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub facade: Arc<DataFacade>,
    pub user: UserId,
}

impl TestContext {
    /// Context signed in as `uid` with an unrestricted policy.
    ///
    /// # Panics
    ///
    /// Panics if seeding the sample catalog fails.
    pub async fn signed_in(uid: &str) -> Self {
        Self::with_policy(uid, PolicyContext::default()).await
    }

    /// Context signed in as `uid` under a specific policy.
    ///
    /// # Panics
    ///
    /// Panics if seeding the sample catalog fails.
    pub async fn with_policy(uid: &str, policy: PolicyContext) -> Self {
        let store = Arc::new(MemoryStore::new());
        let facade = Arc::new(DataFacade::new(
            store.clone(),
            Arc::new(StaticIdentity::signed_in(uid)),
            policy,
        ));
        facade
            .bootstrap(|| async { Ok(sample_catalog()) })
            .await
            .expect("bootstrap failed");
        Self {
            store,
            facade,
            user: UserId::new(uid),
        }
    }
}

/// A small valid catalog covering several categories.
#[must_use]
pub fn sample_catalog() -> Vec<Value> {
    vec![
        json!({
            "id": "content-jollof",
            "title": "Jollof basics",
            "summary": "A first pot of jollof.",
            "category": "cook",
            "subcategory": "african",
            "type": "video",
            "durationMin": 14,
            "createdAt": "2025-02-01T08:00:00Z"
        }),
        json!({
            "id": "content-tap",
            "title": "Fix a leaky tap",
            "summary": "Replace a worn washer.",
            "category": "diy",
            "subcategory": "maintenance",
            "type": "video",
            "createdAt": "2025-02-11T08:00:00Z"
        }),
        json!({
            "id": "content-chores",
            "title": "A chore chart kids actually use",
            "summary": "Build a weekly chart together.",
            "category": "family",
            "subcategory": "kids",
            "type": "activity",
            "createdAt": "2025-02-13T08:00:00Z"
        }),
    ]
}
