//! Content catalog repository.

use serde_json::Value;

use crate::error::Result;
use crate::model::{self, Content};
use crate::store::{CollectionStore, keys};
use crate::taxonomy::{Category, ContentType, Subcategory};
use crate::types::ContentId;

/// Filter for catalog listings. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentFilter {
    pub category: Option<Category>,
    pub subcategory: Option<Subcategory>,
    #[serde(rename = "type")]
    pub content_type: Option<ContentType>,
}

impl ContentFilter {
    fn matches(&self, content: &Content) -> bool {
        self.category.is_none_or(|c| content.category == c)
            && self.subcategory.is_none_or(|s| content.subcategory == s)
            && self.content_type.is_none_or(|t| content.content_type == t)
    }
}

/// Repository for the content catalog collection.
pub struct ContentRepository<'a> {
    store: &'a dyn CollectionStore,
}

impl<'a> ContentRepository<'a> {
    /// Create a repository view over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn CollectionStore) -> Self {
        Self { store }
    }

    fn load_all(&self) -> Result<Vec<Content>> {
        self.store
            .get(keys::CONTENT)?
            .iter()
            .map(|row| Content::from_value(row).map_err(Into::into))
            .collect()
    }

    /// List catalog content matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Propagates store failures and validation failures on stored rows.
    pub fn list(&self, filter: &ContentFilter) -> Result<Vec<Content>> {
        let mut rows: Vec<Content> = self
            .load_all()?
            .into_iter()
            .filter(|content| filter.matches(content))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    /// Look up one content item. Missing content is an expected condition,
    /// so this is an `Option`, not an error.
    ///
    /// # Errors
    ///
    /// Propagates store failures and validation failures on stored rows.
    pub fn get_by_id(&self, id: &ContentId) -> Result<Option<Content>> {
        Ok(self
            .load_all()?
            .into_iter()
            .find(|content| &content.id == id))
    }

    /// The `limit` newest catalog items.
    ///
    /// # Errors
    ///
    /// Propagates store failures and validation failures on stored rows.
    pub fn list_suggested(&self, limit: usize) -> Result<Vec<Content>> {
        let mut rows = self.list(&ContentFilter::default())?;
        rows.truncate(limit);
        Ok(rows)
    }

    /// Replace the whole catalog with `records`, validating every one before
    /// anything is written. Seed/admin path.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure without writing, or a store
    /// failure.
    pub fn replace_all(&self, records: &[Value]) -> Result<Vec<Content>> {
        let parsed: Vec<Content> = records
            .iter()
            .map(|row| Content::from_value(row).map_err(Into::into))
            .collect::<Result<_>>()?;
        let rows = parsed.iter().map(model::to_value).collect();
        self.store.set(keys::CONTENT, rows)?;
        tracing::info!(count = parsed.len(), "content catalog replaced");
        Ok(parsed)
    }

    /// Whether the catalog collection has ever been written.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn is_seeded(&self) -> Result<bool> {
        Ok(self.store.has(keys::CONTENT)? && !self.store.get(keys::CONTENT)?.is_empty())
    }
}
