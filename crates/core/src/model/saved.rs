//! Saved-content documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{require_object, required_datetime, required_str};
use crate::error::ValidationError;
use crate::types::{ContentId, SavedContentId, UserId};

/// A user's bookmark of one content item.
///
/// The id is derived from `(user_id, content_id)`, so repeated saves resolve
/// to the same document and the pair is unique by construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SavedContent {
    pub id: SavedContentId,
    pub user_id: UserId,
    pub content_id: ContentId,
    pub saved_at: DateTime<Utc>,
}

impl SavedContent {
    /// Build a new saved-content row for a pair, stamped `saved_at` now.
    #[must_use]
    pub fn new(user_id: UserId, content_id: ContentId, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: SavedContentId::for_pair(&user_id, &content_id),
            user_id,
            content_id,
            saved_at,
        }
    }

    /// Validate a raw store document.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first offending field.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let fields = require_object(value)?;
        Ok(Self {
            id: SavedContentId::new(required_str(fields, "id")?),
            user_id: UserId::new(required_str(fields, "userId")?),
            content_id: ContentId::new(required_str(fields, "contentId")?),
            saved_at: required_datetime(fields, "savedAt")?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_derives_pair_id() {
        let row = SavedContent::new(UserId::new("user-1"), ContentId::new("content-2"), Utc::now());
        assert_eq!(row.id.as_str(), "user-1_content-2");
    }

    #[test]
    fn test_rejects_missing_content_id() {
        let err = SavedContent::from_value(&json!({
            "id": "user-1_content-2",
            "userId": "user-1",
            "savedAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap_err();
        assert_eq!(err.field, "contentId");
    }
}
