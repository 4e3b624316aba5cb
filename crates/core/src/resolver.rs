//! Cross-collection joins: continue-watching and saved-content views.
//!
//! Joins over a document store have no referential integrity, so dangling
//! references are a normal runtime condition here. The resolver classifies
//! them explicitly — orphaned saves are tagged, never dropped, and a
//! progress row pointing at removed content is a `deleted` state, not an
//! error and not a silent `None`.

use serde::Serialize;

use crate::error::{Result, ValidationError};
use crate::model::{Content, ContentProgress, SavedContent};
use crate::repo::{ContentRepository, ContentProgressRepository, SavedContentRepository};
use crate::store::CollectionStore;
use crate::types::UserId;

/// Result of resolving a user's most recent progress to playable content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContinueWatching {
    /// The user has no progress rows.
    Empty,
    /// The most recent progress row fails shape validation — corrupted data
    /// surfaced defensively rather than coerced.
    Stale { reason: ValidationError },
    /// The progress row references content that no longer exists.
    Deleted { progress: ContentProgress },
    /// The normal case.
    Ready {
        progress: ContentProgress,
        content: Content,
    },
}

/// One saved row joined against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    pub saved: SavedContent,
    /// The joined catalog row; `None` when the content has been removed.
    pub content: Option<Content>,
    /// Tag for surfaces: orphaned saves must be shown with a removal
    /// action, not hidden.
    pub is_orphaned: bool,
}

/// Join resolver over the saved/progress/content collections.
pub struct Resolver<'a> {
    store: &'a dyn CollectionStore,
}

impl<'a> Resolver<'a> {
    /// Create a resolver view over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn CollectionStore) -> Self {
        Self { store }
    }

    /// Resolve the user's most recent progress row into one of four states.
    ///
    /// # Errors
    ///
    /// Propagates store failures; malformed rows become
    /// [`ContinueWatching::Stale`] rather than errors.
    pub fn continue_watching(&self, user_id: &UserId) -> Result<ContinueWatching> {
        let progress_repo = ContentProgressRepository::new(self.store);

        let Some(raw) = progress_repo.most_recent_raw_for_user(user_id)? else {
            return Ok(ContinueWatching::Empty);
        };

        let progress = match ContentProgress::from_value(&raw) {
            Ok(progress) => progress,
            Err(reason) => {
                tracing::warn!(user = %user_id, %reason, "stale progress row");
                return Ok(ContinueWatching::Stale { reason });
            }
        };

        let content = ContentRepository::new(self.store).get_by_id(&progress.content_id)?;
        Ok(match content {
            Some(content) => ContinueWatching::Ready { progress, content },
            None => ContinueWatching::Deleted { progress },
        })
    }

    /// Batch-join the user's saved rows to the catalog, tagging orphans.
    ///
    /// # Errors
    ///
    /// Propagates store failures and validation failures on stored rows.
    pub fn list_saved(&self, user_id: &UserId) -> Result<Vec<SavedItem>> {
        let saved = SavedContentRepository::new(self.store).list_by_user(user_id)?;
        let catalog = ContentRepository::new(self.store);

        saved
            .into_iter()
            .map(|row| {
                let content = catalog.get_by_id(&row.content_id)?;
                let is_orphaned = content.is_none();
                if is_orphaned {
                    tracing::debug!(user = %user_id, saved = %row.id, "orphaned saved row");
                }
                Ok(SavedItem {
                    saved: row,
                    content,
                    is_orphaned,
                })
            })
            .collect()
    }
}
