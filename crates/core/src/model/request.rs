//! Service-request documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    optional_bool, optional_datetime, optional_str, require_object, required_datetime,
    required_enum, required_str,
};
use crate::error::ValidationError;
use crate::taxonomy::{RequestStatus, RequestType};
use crate::types::{RequestId, UserId};

/// A household service request (maid, driver, escort, ...).
///
/// Requesters create `pending` rows. User-initiated edits are limited to
/// `notes` and `cancel_requested`, and only while the request is `pending`;
/// every other transition belongs to the operator workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: RequestId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<String>,
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_requested: Option<bool>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ServiceRequest {
    /// Validate a raw store document.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first offending field.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let fields = require_object(value)?;
        Ok(Self {
            id: RequestId::new(required_str(fields, "id")?),
            user_id: UserId::new(required_str(fields, "userId")?),
            request_type: required_enum(fields, "type", RequestType::VARIANTS)?,
            phone: optional_str(fields, "phone")?,
            location: optional_str(fields, "location")?,
            notes: required_str(fields, "notes")?,
            preferred_time: optional_str(fields, "preferredTime")?,
            status: required_enum(fields, "status", RequestStatus::VARIANTS)?,
            cancel_requested: optional_bool(fields, "cancelRequested")?,
            created_at: required_datetime(fields, "createdAt")?,
            updated_at: optional_datetime(fields, "updatedAt")?,
        })
    }
}

/// Input for creating a service request. The repository assigns id, owner,
/// `pending` status, and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewServiceRequest {
    #[serde(rename = "type")]
    pub request_type: RequestType,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub notes: String,
    #[serde(default)]
    pub preferred_time: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "id": "request-1",
            "userId": "user-1",
            "type": "maid",
            "notes": "help clean kitchen",
            "status": "pending",
            "createdAt": "2025-01-01T00:00:00Z"
        })
    }

    #[test]
    fn test_parses_minimal_document() {
        let request = ServiceRequest::from_value(&sample()).unwrap();
        assert_eq!(request.request_type, RequestType::Maid);
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.phone, None);
        assert_eq!(request.cancel_requested, None);
    }

    #[test]
    fn test_rejects_unknown_status() {
        let mut doc = sample();
        doc["status"] = json!("archived");
        let err = ServiceRequest::from_value(&doc).unwrap_err();
        assert_eq!(err.field, "status");
    }

    #[test]
    fn test_rejects_empty_notes() {
        let mut doc = sample();
        doc["notes"] = json!("");
        let err = ServiceRequest::from_value(&doc).unwrap_err();
        assert_eq!(err.field, "notes");
    }
}
