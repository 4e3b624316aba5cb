//! Application state shared across handlers.

use std::sync::Arc;

use homehaven_core::DataFacade;
use homehaven_core::identity::DemoIdentityProvider;
use homehaven_core::policy::PolicyContext;
use homehaven_core::store::CollectionStore;

/// Application state shared across all handlers. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    facade: DataFacade,
    identity: Arc<DemoIdentityProvider>,
}

impl AppState {
    /// Build state over a store, wiring the demo identity provider into the
    /// facade.
    #[must_use]
    pub fn new(store: Arc<dyn CollectionStore>, policy: PolicyContext) -> Self {
        let identity = Arc::new(DemoIdentityProvider::new());
        let facade = DataFacade::new(store, identity.clone(), policy);
        Self {
            inner: Arc::new(AppStateInner { facade, identity }),
        }
    }

    /// The data access facade.
    #[must_use]
    pub fn facade(&self) -> &DataFacade {
        &self.inner.facade
    }

    /// The demo identity provider (session routes flip it).
    #[must_use]
    pub fn identity(&self) -> &DemoIdentityProvider {
        &self.inner.identity
    }
}
