//! Saved-content repository.

use chrono::Utc;

use crate::error::{Result, ValidationError};
use crate::model::{self, SavedContent};
use crate::store::{CollectionStore, keys};
use crate::types::{ContentId, SavedContentId, UserId};

/// Repository for the saved-content collection.
pub struct SavedContentRepository<'a> {
    store: &'a dyn CollectionStore,
}

impl<'a> SavedContentRepository<'a> {
    /// Create a repository view over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn CollectionStore) -> Self {
        Self { store }
    }

    /// Save a content item for a user. Idempotent: the deterministic
    /// `(user, content)` id means repeated saves resolve to the existing row.
    ///
    /// # Errors
    ///
    /// Propagates store failures and validation failures on stored rows.
    pub fn save(&self, user_id: &UserId, content_id: &ContentId) -> Result<SavedContent> {
        let mut outcome: std::result::Result<SavedContent, ValidationError> = Err(
            ValidationError::new("<document>", "saved-content row after write"),
        );

        self.store.update(keys::SAVED_CONTENT, &mut |mut rows| {
            let existing = rows
                .iter()
                .map(SavedContent::from_value)
                .collect::<std::result::Result<Vec<_>, _>>();

            match existing {
                Err(err) => outcome = Err(err),
                Ok(parsed) => {
                    if let Some(found) = parsed
                        .iter()
                        .find(|row| &row.user_id == user_id && &row.content_id == content_id)
                    {
                        outcome = Ok(found.clone());
                    } else {
                        let row =
                            SavedContent::new(user_id.clone(), content_id.clone(), Utc::now());
                        rows.push(model::to_value(&row));
                        outcome = Ok(row);
                    }
                }
            }
            rows
        })?;

        outcome.map_err(Into::into)
    }

    /// All saved rows belonging to a user.
    ///
    /// # Errors
    ///
    /// Propagates store failures and validation failures on stored rows.
    pub fn list_by_user(&self, user_id: &UserId) -> Result<Vec<SavedContent>> {
        Ok(self
            .store
            .get(keys::SAVED_CONTENT)?
            .iter()
            .map(SavedContent::from_value)
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|row| &row.user_id == user_id)
            .collect())
    }

    /// Whether a `(user, content)` pair is currently saved.
    ///
    /// # Errors
    ///
    /// Propagates store failures and validation failures on stored rows.
    pub fn is_saved(&self, user_id: &UserId, content_id: &ContentId) -> Result<bool> {
        Ok(self
            .list_by_user(user_id)?
            .iter()
            .any(|row| &row.content_id == content_id))
    }

    /// Remove one saved row owned by `user_id`. Returns whether a row was
    /// removed (also the path for clearing orphaned saves).
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn remove(&self, user_id: &UserId, saved_id: &SavedContentId) -> Result<bool> {
        let mut removed = false;
        self.store.update(keys::SAVED_CONTENT, &mut |rows| {
            let before = rows.len();
            let kept: Vec<_> = rows
                .into_iter()
                .filter(|row| {
                    let matches = row.get("id").and_then(|v| v.as_str())
                        == Some(saved_id.as_str())
                        && row.get("userId").and_then(|v| v.as_str()) == Some(user_id.as_str());
                    !matches
                })
                .collect();
            removed = kept.len() != before;
            kept
        })?;
        Ok(removed)
    }

    /// Drop every saved row belonging to a user (erasure cascade).
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn remove_all_for_user(&self, user_id: &UserId) -> Result<usize> {
        let mut dropped = 0;
        self.store.update(keys::SAVED_CONTENT, &mut |rows| {
            let before = rows.len();
            let kept: Vec<_> = rows
                .into_iter()
                .filter(|row| row.get("userId").and_then(|v| v.as_str()) != Some(user_id.as_str()))
                .collect();
            dropped = before - kept.len();
            kept
        })?;
        Ok(dropped)
    }
}
