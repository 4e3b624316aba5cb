//! Catalog content documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    optional_bool, optional_number, optional_str, optional_str_array, require_object,
    required_datetime, required_enum, required_str,
};
use crate::error::ValidationError;
use crate::taxonomy::{Category, ContentType, Subcategory};
use crate::types::ContentId;

/// A catalog content item (video, guide, activity, story, checklist).
///
/// Read-mostly: written only by seed/admin operations and the bootstrap
/// ingest, both of which validate every record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: ContentId,
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
    pub subcategory: Subcategory,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Background/detail media. Older documents used the `bgVideo` key.
    #[serde(alias = "bgVideo", skip_serializing_if = "Option::is_none")]
    pub media_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_auth: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl Content {
    /// Validate a raw store document into a `Content`.
    ///
    /// Enforces the taxonomy cross-field invariant: the subcategory must
    /// belong to the document's category.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first offending field.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let fields = require_object(value)?;

        let category: Category = required_enum(fields, "category", Category::VARIANTS)?;
        let subcategory: Subcategory = required_enum(fields, "subcategory", Subcategory::VARIANTS)?;
        if subcategory.category() != category {
            return Err(ValidationError::new(
                "subcategory",
                format!(
                    "a subcategory of \"{category}\" (one of: {})",
                    category
                        .subcategories()
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            ));
        }

        let media_path = match optional_str(fields, "mediaPath")? {
            Some(path) => Some(path),
            None => optional_str(fields, "bgVideo")?,
        };

        Ok(Self {
            id: ContentId::new(required_str(fields, "id")?),
            title: required_str(fields, "title")?,
            summary: required_str(fields, "summary")?,
            description: optional_str(fields, "description")?,
            category,
            subcategory,
            content_type: required_enum(fields, "type", ContentType::VARIANTS)?,
            audience: optional_str(fields, "audience")?,
            duration_min: optional_number(fields, "durationMin")?,
            tags: optional_str_array(fields, "tags")?,
            cover_image: optional_str(fields, "coverImage")?,
            media_path,
            requires_auth: optional_bool(fields, "requiresAuth")?,
            created_at: required_datetime(fields, "createdAt")?,
        })
    }
}
