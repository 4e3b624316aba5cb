//! User, privacy-erasure, and parental-consent repositories.

use chrono::Utc;

use crate::error::{Result, ValidationError};
use crate::model::{self, ParentalConsent, PrivacyErasureRequest, User};
use crate::store::{CollectionStore, keys};
use crate::taxonomy::UserStatus;
use crate::types::{ConsentId, ErasureId, UserId};

/// Profile fields a user may change after sign-up.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub locale: Option<String>,
    pub plan: Option<String>,
    pub marketing_consent: Option<bool>,
}

/// Repository for the users collection.
pub struct UserRepository<'a> {
    store: &'a dyn CollectionStore,
}

impl<'a> UserRepository<'a> {
    /// Create a repository view over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn CollectionStore) -> Self {
        Self { store }
    }

    fn load_all(&self) -> Result<Vec<User>> {
        self.store
            .get(keys::USERS)?
            .iter()
            .map(|row| User::from_value(row).map_err(Into::into))
            .collect()
    }

    /// Look up a profile by uid.
    ///
    /// # Errors
    ///
    /// Propagates store failures and validation failures on stored rows.
    pub fn get_by_id(&self, uid: &UserId) -> Result<Option<User>> {
        Ok(self.load_all()?.into_iter().find(|user| &user.uid == uid))
    }

    /// Create the profile row on first sign-in; later sign-ins return the
    /// existing row untouched.
    ///
    /// # Errors
    ///
    /// Rejects malformed emails; propagates store failures.
    pub fn upsert_on_sign_in(
        &self,
        uid: &UserId,
        full_name: &str,
        email: &str,
    ) -> Result<User> {
        if !email.contains('@') {
            return Err(ValidationError::new("email", "email address with an @").into());
        }
        if full_name.trim().is_empty() {
            return Err(ValidationError::new("fullName", "non-empty string").into());
        }

        let mut outcome: std::result::Result<User, ValidationError> =
            Err(ValidationError::new("<document>", "user row after write"));

        self.store.update(keys::USERS, &mut |mut rows| {
            let existing = rows
                .iter()
                .find(|row| row.get("uid").and_then(|v| v.as_str()) == Some(uid.as_str()));

            if let Some(row) = existing {
                outcome = User::from_value(row);
                return rows;
            }

            let now = Utc::now();
            let user = User {
                uid: uid.clone(),
                full_name: full_name.to_owned(),
                email: email.to_owned(),
                plan: "free".to_owned(),
                locale: "en".to_owned(),
                marketing_consent: false,
                status: UserStatus::Active,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            rows.push(model::to_value(&user));
            outcome = Ok(user);
            rows
        })?;

        outcome.map_err(Into::into)
    }

    /// Apply a profile update. Returns `None` when no such user exists.
    ///
    /// # Errors
    ///
    /// Rejects empty names; propagates store and validation failures.
    pub fn update_profile(&self, uid: &UserId, update: &ProfileUpdate) -> Result<Option<User>> {
        if let Some(name) = &update.full_name
            && name.trim().is_empty()
        {
            return Err(ValidationError::new("fullName", "non-empty string").into());
        }

        let mut outcome: std::result::Result<Option<User>, ValidationError> = Ok(None);

        self.store.update(keys::USERS, &mut |mut rows| {
            let found = rows
                .iter_mut()
                .find(|row| row.get("uid").and_then(|v| v.as_str()) == Some(uid.as_str()));
            let Some(slot) = found else {
                return rows;
            };

            let mut user = match User::from_value(slot) {
                Ok(user) => user,
                Err(err) => {
                    outcome = Err(err);
                    return rows;
                }
            };

            if let Some(name) = &update.full_name {
                user.full_name = name.clone();
            }
            if let Some(locale) = &update.locale {
                user.locale = locale.clone();
            }
            if let Some(plan) = &update.plan {
                user.plan = plan.clone();
            }
            if let Some(consent) = update.marketing_consent {
                user.marketing_consent = consent;
            }
            user.updated_at = Utc::now();

            *slot = model::to_value(&user);
            outcome = Ok(Some(user));
            rows
        })?;

        outcome.map_err(Into::into)
    }

    /// Soft-delete: flip status to `pending_deletion` and stamp `deleted_at`.
    /// The row itself is never removed. Returns `false` if no such user.
    ///
    /// # Errors
    ///
    /// Propagates store and validation failures.
    pub fn mark_pending_deletion(&self, uid: &UserId) -> Result<bool> {
        let mut outcome: std::result::Result<bool, ValidationError> = Ok(false);

        self.store.update(keys::USERS, &mut |mut rows| {
            let found = rows
                .iter_mut()
                .find(|row| row.get("uid").and_then(|v| v.as_str()) == Some(uid.as_str()));
            let Some(slot) = found else {
                return rows;
            };

            match User::from_value(slot) {
                Err(err) => outcome = Err(err),
                Ok(mut user) => {
                    let now = Utc::now();
                    user.status = UserStatus::PendingDeletion;
                    user.deleted_at = Some(now);
                    user.updated_at = now;
                    *slot = model::to_value(&user);
                    outcome = Ok(true);
                }
            }
            rows
        })?;

        outcome.map_err(Into::into)
    }
}

/// Repository for privacy-erasure requests.
pub struct ErasureRepository<'a> {
    store: &'a dyn CollectionStore,
}

impl<'a> ErasureRepository<'a> {
    /// Create a repository view over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn CollectionStore) -> Self {
        Self { store }
    }

    /// Record an erasure request for a user.
    ///
    /// # Errors
    ///
    /// Rejects empty reasons; propagates store failures.
    pub fn create(&self, user_id: &UserId, reason: &str) -> Result<PrivacyErasureRequest> {
        if reason.trim().is_empty() {
            return Err(ValidationError::new("reason", "non-empty string").into());
        }

        let row = PrivacyErasureRequest {
            id: ErasureId::random(),
            user_id: user_id.clone(),
            kind: PrivacyErasureRequest::KIND.to_owned(),
            status: "pending".to_owned(),
            reason: reason.to_owned(),
            created_at: Utc::now(),
        };
        let encoded = model::to_value(&row);
        self.store.update(keys::ERASURES, &mut |mut rows| {
            rows.push(encoded.clone());
            rows
        })?;
        Ok(row)
    }

    /// All erasure rows for a user.
    ///
    /// # Errors
    ///
    /// Propagates store failures and validation failures on stored rows.
    pub fn list_by_user(&self, user_id: &UserId) -> Result<Vec<PrivacyErasureRequest>> {
        Ok(self
            .store
            .get(keys::ERASURES)?
            .iter()
            .map(PrivacyErasureRequest::from_value)
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|row| &row.user_id == user_id)
            .collect())
    }
}

/// Repository for parental-consent placeholders.
pub struct ConsentRepository<'a> {
    store: &'a dyn CollectionStore,
}

impl<'a> ConsentRepository<'a> {
    /// Create a repository view over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn CollectionStore) -> Self {
        Self { store }
    }

    /// Record a consent placeholder for a user.
    ///
    /// # Errors
    ///
    /// Rejects negative/non-finite ages and blank jurisdictions; propagates
    /// store failures.
    pub fn create_placeholder(
        &self,
        user_id: &UserId,
        child_age: f64,
        jurisdiction: &str,
    ) -> Result<ParentalConsent> {
        if !child_age.is_finite() || child_age < 0.0 {
            return Err(ValidationError::new("childAge", "finite number >= 0").into());
        }
        if jurisdiction.trim().is_empty() {
            return Err(ValidationError::new("jurisdiction", "non-empty string").into());
        }

        let row = ParentalConsent {
            id: ConsentId::random(),
            user_id: user_id.clone(),
            child_age,
            jurisdiction: jurisdiction.to_owned(),
            status: ParentalConsent::STATUS_PLACEHOLDER.to_owned(),
            created_at: Utc::now(),
        };
        let encoded = model::to_value(&row);
        self.store.update(keys::CONSENTS, &mut |mut rows| {
            rows.push(encoded.clone());
            rows
        })?;
        Ok(row)
    }

    /// Whether any consent row exists for a user.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn exists_for_user(&self, user_id: &UserId) -> Result<bool> {
        Ok(self
            .store
            .get(keys::CONSENTS)?
            .iter()
            .any(|row| row.get("userId").and_then(|v| v.as_str()) == Some(user_id.as_str())))
    }
}
