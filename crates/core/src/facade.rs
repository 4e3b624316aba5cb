//! Data access facade.
//!
//! The single surface UI and CLI collaborators call. Composes the
//! repositories, the join resolver, and the policy gate, and enforces the
//! identity-ownership check before touching storage: no identity ⇒
//! `Unauthenticated`, mismatched uid ⇒ `OwnershipMismatch`, and in both
//! cases nothing is written. Content catalog reads are public.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{DataError, Result};
use crate::identity::{AuthUser, IdentityProvider};
use crate::model::{
    Content, ContentProgress, NewServiceRequest, ParentalConsent, PrivacyErasureRequest,
    SavedContent, ServiceRequest, User,
};
use crate::policy::{AgeCategory, PolicyContext};
use crate::repo::{
    ConsentRepository, ContentFilter, ContentProgressRepository, ContentRepository,
    ErasureRepository, ProfileUpdate, ProgressWrite, RequestUpdateOutcome,
    SavedContentRepository, ServiceRequestRepository, UserRepository,
};
use crate::resolver::{ContinueWatching, Resolver, SavedItem};
use crate::store::{CollectionStore, keys};
use crate::types::{ContentId, RequestId, SavedContentId, UserId};

/// The facade over the offline data repository.
pub struct DataFacade {
    store: Arc<dyn CollectionStore>,
    identity: Arc<dyn IdentityProvider>,
    policy: PolicyContext,
}

impl DataFacade {
    /// Assemble a facade from its injected collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn CollectionStore>,
        identity: Arc<dyn IdentityProvider>,
        policy: PolicyContext,
    ) -> Self {
        Self {
            store,
            identity,
            policy,
        }
    }

    /// The active policy configuration.
    #[must_use]
    pub const fn policy(&self) -> &PolicyContext {
        &self.policy
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<AuthUser> {
        self.identity.current_user()
    }

    /// Resolve the authenticated identity and check it matches `user_id`.
    fn authorize(&self, user_id: &UserId) -> Result<AuthUser> {
        let user = self
            .identity
            .current_user()
            .ok_or(DataError::Unauthenticated)?;
        if &user.uid != user_id {
            return Err(DataError::OwnershipMismatch {
                authenticated: user.uid.into_inner(),
                supplied: user_id.as_str().to_owned(),
            });
        }
        Ok(user)
    }

    // ------------------------------------------------------------------
    // Bootstrap

    /// Initialize the collections, seeding the content catalog from
    /// `loader` only when it has never been written. The loader's payload
    /// is validated record by record before anything lands in the store.
    ///
    /// # Errors
    ///
    /// Loader failures become [`DataError::Bootstrap`]; invalid catalog
    /// records are validation errors and nothing is written.
    pub async fn bootstrap<F, Fut>(&self, loader: F) -> Result<usize>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<Vec<Value>, Box<dyn std::error::Error + Send + Sync>>>,
    {
        let mut seeded = 0;
        if self.content_repo().is_seeded()? {
            tracing::debug!("content catalog already seeded, skipping loader");
        } else {
            let records = loader()
                .await
                .map_err(|err| DataError::Bootstrap(err.to_string()))?;
            seeded = self.content_repo().replace_all(&records)?.len();
        }

        // Make sure every collection exists so later reads see an empty
        // sequence instead of "never written".
        for key in [
            keys::USERS,
            keys::SAVED_CONTENT,
            keys::CONTENT_PROGRESS,
            keys::REQUESTS,
            keys::ERASURES,
            keys::CONSENTS,
        ] {
            if !self.store.has(key)? {
                self.store.set(key, Vec::new())?;
            }
        }
        Ok(seeded)
    }

    /// Ensure a profile row exists for the signed-in user (first sign-in
    /// creates it).
    ///
    /// # Errors
    ///
    /// Fails with [`DataError::Unauthenticated`] when signed out.
    pub fn ensure_profile(&self) -> Result<User> {
        let user = self
            .identity
            .current_user()
            .ok_or(DataError::Unauthenticated)?;
        self.user_repo()
            .upsert_on_sign_in(&user.uid, &user.full_name, &user.email)
    }

    // ------------------------------------------------------------------
    // Content (public catalog)

    /// List catalog content matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Propagates store and validation failures.
    pub fn list_content(&self, filter: &ContentFilter) -> Result<Vec<Content>> {
        self.content_repo().list(filter)
    }

    /// Look up one catalog item; missing content is `None`, not an error.
    ///
    /// # Errors
    ///
    /// Propagates store and validation failures.
    pub fn get_content(&self, id: &ContentId) -> Result<Option<Content>> {
        self.content_repo().get_by_id(id)
    }

    /// The `limit` newest catalog items.
    ///
    /// # Errors
    ///
    /// Propagates store and validation failures.
    pub fn list_suggested(&self, limit: usize) -> Result<Vec<Content>> {
        self.content_repo().list_suggested(limit)
    }

    // ------------------------------------------------------------------
    // Saved content

    /// Save a content item for the user (idempotent).
    ///
    /// # Errors
    ///
    /// Ownership and store/validation failures.
    pub fn save_content(&self, user_id: &UserId, content_id: &ContentId) -> Result<SavedContent> {
        self.authorize(user_id)?;
        self.saved_repo().save(user_id, content_id)
    }

    /// Remove a saved row (also clears orphaned saves).
    ///
    /// # Errors
    ///
    /// Ownership and store failures.
    pub fn unsave_content(&self, user_id: &UserId, saved_id: &SavedContentId) -> Result<bool> {
        self.authorize(user_id)?;
        self.saved_repo().remove(user_id, saved_id)
    }

    /// Whether the pair is currently saved.
    ///
    /// # Errors
    ///
    /// Ownership and store/validation failures.
    pub fn is_saved(&self, user_id: &UserId, content_id: &ContentId) -> Result<bool> {
        self.authorize(user_id)?;
        self.saved_repo().is_saved(user_id, content_id)
    }

    /// The user's saved rows joined to the catalog, orphans tagged.
    ///
    /// # Errors
    ///
    /// Ownership and store/validation failures.
    pub fn list_saved(&self, user_id: &UserId) -> Result<Vec<SavedItem>> {
        self.authorize(user_id)?;
        Resolver::new(self.store.as_ref()).list_saved(user_id)
    }

    // ------------------------------------------------------------------
    // Progress

    /// Delta progress write (`max(0, current + delta)`).
    ///
    /// # Errors
    ///
    /// Ownership and store/validation failures.
    pub fn add_progress(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
        delta_seconds: f64,
    ) -> Result<ContentProgress> {
        self.authorize(user_id)?;
        self.progress_repo().add_delta(user_id, content_id, delta_seconds)
    }

    /// Absolute progress write behind the regression guard.
    ///
    /// # Errors
    ///
    /// Ownership and store/validation failures; a blocked regression is a
    /// [`ProgressWrite`] outcome, not an error.
    pub fn set_progress(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
        progress_seconds: f64,
        allow_restart: bool,
    ) -> Result<ProgressWrite> {
        self.authorize(user_id)?;
        self.progress_repo()
            .set_absolute(user_id, content_id, progress_seconds, allow_restart)
    }

    /// The stored progress for a pair, if any.
    ///
    /// # Errors
    ///
    /// Ownership and store/validation failures.
    pub fn get_progress(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
    ) -> Result<Option<ContentProgress>> {
        self.authorize(user_id)?;
        self.progress_repo().get(user_id, content_id)
    }

    /// Resolve the user's continue-watching state.
    ///
    /// # Errors
    ///
    /// Ownership and store failures.
    pub fn continue_watching(&self, user_id: &UserId) -> Result<ContinueWatching> {
        self.authorize(user_id)?;
        Resolver::new(self.store.as_ref()).continue_watching(user_id)
    }

    // ------------------------------------------------------------------
    // Service requests

    /// Submit a service request on behalf of the user.
    ///
    /// The policy gate runs first: a disabled request type, or a missing
    /// parental-consent placeholder for an under-13 requester in a covered
    /// jurisdiction, refuses the submission with a policy error.
    ///
    /// # Errors
    ///
    /// Ownership, policy, and store/validation failures.
    pub fn create_request(
        &self,
        user_id: &UserId,
        input: NewServiceRequest,
        age_category: AgeCategory,
    ) -> Result<ServiceRequest> {
        self.authorize(user_id)?;

        if !self.policy.is_request_type_allowed(input.request_type) {
            return Err(crate::error::PolicyViolation::RequestTypeDisabled {
                request_type: input.request_type,
                jurisdiction: self.policy.jurisdiction.clone(),
            }
            .into());
        }

        if self.policy.requires_parental_consent(age_category)
            && !self.consent_repo().exists_for_user(user_id)?
        {
            return Err(crate::error::PolicyViolation::ParentalConsentRequired {
                jurisdiction: self.policy.jurisdiction.clone(),
            }
            .into());
        }

        self.request_repo().submit(user_id, input)
    }

    /// The user's request history, newest first.
    ///
    /// # Errors
    ///
    /// Ownership and store/validation failures.
    pub fn list_requests(&self, user_id: &UserId) -> Result<Vec<ServiceRequest>> {
        self.authorize(user_id)?;
        self.request_repo().list_by_user(user_id)
    }

    /// Apply an allow-listed user edit to a pending request.
    ///
    /// # Errors
    ///
    /// Ownership and store/validation failures; disallowed edits are
    /// [`RequestUpdateOutcome`] values.
    pub fn update_request_by_user(
        &self,
        user_id: &UserId,
        request_id: &RequestId,
        updates: &Map<String, Value>,
    ) -> Result<RequestUpdateOutcome> {
        self.authorize(user_id)?;
        self.request_repo().update_by_user(user_id, request_id, updates)
    }

    // ------------------------------------------------------------------
    // Privacy

    /// Record a parental-consent placeholder for the user in the active
    /// jurisdiction.
    ///
    /// # Errors
    ///
    /// Ownership and store/validation failures.
    pub fn create_parental_consent_placeholder(
        &self,
        user_id: &UserId,
        child_age: f64,
    ) -> Result<ParentalConsent> {
        self.authorize(user_id)?;
        self.consent_repo()
            .create_placeholder(user_id, child_age, &self.policy.jurisdiction)
    }

    /// Account deletion: record the erasure request, cascade-remove the
    /// user's saved content, progress, and service requests, and soft-delete
    /// the profile (`pending_deletion` — the row is never removed).
    ///
    /// # Errors
    ///
    /// Ownership and store/validation failures.
    pub fn request_account_deletion(
        &self,
        user_id: &UserId,
        reason: &str,
    ) -> Result<PrivacyErasureRequest> {
        self.authorize(user_id)?;

        let erasure = ErasureRepository::new(self.store.as_ref()).create(user_id, reason)?;

        let saved = self.saved_repo().remove_all_for_user(user_id)?;
        let progress = self.progress_repo().remove_all_for_user(user_id)?;
        let requests = self.request_repo().remove_all_for_user(user_id)?;
        self.user_repo().mark_pending_deletion(user_id)?;

        tracing::info!(
            user = %user_id,
            saved,
            progress,
            requests,
            "privacy erasure cascade completed"
        );
        Ok(erasure)
    }

    // ------------------------------------------------------------------
    // Profile

    /// The user's profile row, if one exists.
    ///
    /// # Errors
    ///
    /// Ownership and store/validation failures.
    pub fn get_profile(&self, user_id: &UserId) -> Result<Option<User>> {
        self.authorize(user_id)?;
        self.user_repo().get_by_id(user_id)
    }

    /// Apply a profile update.
    ///
    /// # Errors
    ///
    /// [`DataError::NotFound`] when no profile row exists; ownership and
    /// store/validation failures otherwise.
    pub fn update_profile(&self, user_id: &UserId, update: &ProfileUpdate) -> Result<User> {
        self.authorize(user_id)?;
        self.user_repo()
            .update_profile(user_id, update)?
            .ok_or_else(|| DataError::NotFound(format!("user \"{user_id}\"")))
    }

    // ------------------------------------------------------------------

    fn content_repo(&self) -> ContentRepository<'_> {
        ContentRepository::new(self.store.as_ref())
    }

    fn saved_repo(&self) -> SavedContentRepository<'_> {
        SavedContentRepository::new(self.store.as_ref())
    }

    fn progress_repo(&self) -> ContentProgressRepository<'_> {
        ContentProgressRepository::new(self.store.as_ref())
    }

    fn request_repo(&self) -> ServiceRequestRepository<'_> {
        ServiceRequestRepository::new(self.store.as_ref())
    }

    fn user_repo(&self) -> UserRepository<'_> {
        UserRepository::new(self.store.as_ref())
    }

    fn consent_repo(&self) -> ConsentRepository<'_> {
        ConsentRepository::new(self.store.as_ref())
    }
}
