//! User, privacy-erasure, and parental-consent documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    optional_bool, optional_datetime, require_object, required_datetime, required_enum,
    required_number, required_str,
};
use crate::error::ValidationError;
use crate::taxonomy::UserStatus;
use crate::types::{ConsentId, ErasureId, UserId};

/// An account profile.
///
/// Accounts are only ever soft-deleted: erasure flips `status` to
/// `pending_deletion` and stamps `deleted_at`, the row itself stays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: UserId,
    pub full_name: String,
    pub email: String,
    pub plan: String,
    pub locale: String,
    pub marketing_consent: bool,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Validate a raw store document.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first offending field.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let fields = require_object(value)?;

        let email = required_str(fields, "email")?;
        if !email.contains('@') {
            return Err(ValidationError::new("email", "email address with an @"));
        }

        Ok(Self {
            uid: UserId::new(required_str(fields, "uid")?),
            full_name: required_str(fields, "fullName")?,
            email,
            plan: required_str(fields, "plan")?,
            locale: required_str(fields, "locale")?,
            marketing_consent: optional_bool(fields, "marketingConsent")?.unwrap_or(false),
            status: required_enum(fields, "status", UserStatus::VARIANTS)?,
            created_at: required_datetime(fields, "createdAt")?,
            updated_at: required_datetime(fields, "updatedAt")?,
            deleted_at: optional_datetime(fields, "deletedAt")?,
        })
    }
}

/// A privacy-erasure request created by account deletion.
///
/// Triggers the cascade that removes the user's saved content, progress, and
/// service requests, and marks the account `pending_deletion`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyErasureRequest {
    pub id: ErasureId,
    pub user_id: UserId,
    /// Request kind tag; always `"erasure"` for rows written by this core.
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl PrivacyErasureRequest {
    /// Kind tag for erasure rows.
    pub const KIND: &'static str = "erasure";

    /// Validate a raw store document.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first offending field.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let fields = require_object(value)?;
        Ok(Self {
            id: ErasureId::new(required_str(fields, "id")?),
            user_id: UserId::new(required_str(fields, "userId")?),
            kind: required_str(fields, "type")?,
            status: required_str(fields, "status")?,
            reason: required_str(fields, "reason")?,
            created_at: required_datetime(fields, "createdAt")?,
        })
    }
}

/// A parental-consent placeholder for an under-13 user.
///
/// Records that a guardian started the consent flow; the real verification
/// workflow lives outside this core. The policy gate only checks existence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParentalConsent {
    pub id: ConsentId,
    pub user_id: UserId,
    pub child_age: f64,
    pub jurisdiction: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl ParentalConsent {
    /// Status of a consent row that has not been verified yet.
    pub const STATUS_PLACEHOLDER: &'static str = "placeholder";

    /// Validate a raw store document.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first offending field.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let fields = require_object(value)?;
        Ok(Self {
            id: ConsentId::new(required_str(fields, "id")?),
            user_id: UserId::new(required_str(fields, "userId")?),
            child_age: required_number(fields, "childAge")?,
            jurisdiction: required_str(fields, "jurisdiction")?,
            status: required_str(fields, "status")?,
            created_at: required_datetime(fields, "createdAt")?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_user() -> Value {
        json!({
            "uid": "user-1",
            "fullName": "Demo User",
            "email": "demo@example.com",
            "plan": "free",
            "locale": "en-NG",
            "marketingConsent": false,
            "status": "active",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        })
    }

    #[test]
    fn test_parses_user() {
        let user = User::from_value(&sample_user()).unwrap();
        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.deleted_at, None);
    }

    #[test]
    fn test_rejects_bad_email() {
        let mut doc = sample_user();
        doc["email"] = json!("not-an-email");
        let err = User::from_value(&doc).unwrap_err();
        assert_eq!(err.field, "email");
    }

    #[test]
    fn test_rejects_unknown_status() {
        let mut doc = sample_user();
        doc["status"] = json!("deleted");
        assert!(User::from_value(&doc).is_err());
    }

    #[test]
    fn test_parses_erasure_request() {
        let row = PrivacyErasureRequest::from_value(&json!({
            "id": "erasure-1",
            "userId": "user-1",
            "type": "erasure",
            "status": "pending",
            "reason": "leaving the service",
            "createdAt": "2025-02-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(row.kind, PrivacyErasureRequest::KIND);
    }
}
