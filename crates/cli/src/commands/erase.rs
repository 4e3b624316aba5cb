//! Privacy erasure command.

use std::path::Path;
use std::sync::Arc;

use homehaven_core::DataFacade;
use homehaven_core::identity::StaticIdentity;
use homehaven_core::policy::PolicyContext;
use homehaven_core::store::JsonFileStore;
use homehaven_core::types::UserId;

/// Run the erasure cascade for one user: record the erasure request, remove
/// their saved content, progress, and service requests, and soft-delete the
/// profile.
///
/// The facade's ownership check still applies; the command acts with the
/// target user's identity, the operator equivalent of a user-initiated
/// deletion.
pub fn user(data_dir: &Path, uid: &str, reason: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(JsonFileStore::open(data_dir)?);
    let facade = DataFacade::new(
        store,
        Arc::new(StaticIdentity::signed_in(uid)),
        PolicyContext::default(),
    );

    let erasure = facade.request_account_deletion(&UserId::new(uid), reason)?;
    tracing::info!(id = %erasure.id, user = uid, "erasure recorded and cascade completed");
    Ok(())
}
