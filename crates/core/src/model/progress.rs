//! Content-progress documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{require_object, required_datetime, required_number, required_str};
use crate::error::ValidationError;
use crate::types::{ContentId, ProgressId, UserId};

/// Watch/read progress for one `(user, content)` pair.
///
/// The id is derived from the pair, so there is at most one progress row per
/// pair. `progress_seconds` is monotonically non-decreasing under normal
/// writes; only an explicit restart override may lower it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentProgress {
    pub id: ProgressId,
    pub user_id: UserId,
    pub content_id: ContentId,
    pub progress_seconds: f64,
    pub updated_at: DateTime<Utc>,
}

impl ContentProgress {
    /// Build a fresh progress row for a pair.
    #[must_use]
    pub fn new(
        user_id: UserId,
        content_id: ContentId,
        progress_seconds: f64,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ProgressId::for_pair(&user_id, &content_id),
            user_id,
            content_id,
            progress_seconds,
            updated_at,
        }
    }

    /// Validate a raw store document.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first offending field.
    /// `progress_seconds` must be a finite number `>= 0`.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let fields = require_object(value)?;
        let progress_seconds = required_number(fields, "progressSeconds")?;
        if progress_seconds < 0.0 {
            return Err(ValidationError::new(
                "progressSeconds",
                "finite number >= 0",
            ));
        }
        Ok(Self {
            id: ProgressId::new(required_str(fields, "id")?),
            user_id: UserId::new(required_str(fields, "userId")?),
            content_id: ContentId::new(required_str(fields, "contentId")?),
            progress_seconds,
            updated_at: required_datetime(fields, "updatedAt")?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_negative_progress() {
        let err = ContentProgress::from_value(&json!({
            "id": "user-1_content-2",
            "userId": "user-1",
            "contentId": "content-2",
            "progressSeconds": -5,
            "updatedAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap_err();
        assert_eq!(err.field, "progressSeconds");
    }

    #[test]
    fn test_rejects_non_numeric_progress() {
        let err = ContentProgress::from_value(&json!({
            "id": "user-1_content-2",
            "userId": "user-1",
            "contentId": "content-2",
            "progressSeconds": "30",
            "updatedAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap_err();
        assert_eq!(err.field, "progressSeconds");
    }

    #[test]
    fn test_parses_valid_document() {
        let row = ContentProgress::from_value(&json!({
            "id": "user-1_content-2",
            "userId": "user-1",
            "contentId": "content-2",
            "progressSeconds": 75.5,
            "updatedAt": "2025-01-04T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(row.progress_seconds, 75.5);
        assert_eq!(row.id, ProgressId::for_pair(&row.user_id, &row.content_id));
    }
}
