//! Content-progress repository: monotonic accumulation with a regression
//! guard.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, ValidationError};
use crate::model::{self, ContentProgress};
use crate::store::{CollectionStore, keys};
use crate::types::{ContentId, ProgressId, UserId};

/// Outcome of an absolute progress write.
///
/// A blocked regression is an expected business outcome, not a fault —
/// callers branch on it rather than catching anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[must_use]
pub enum ProgressWrite {
    /// The value was written.
    Persisted {
        #[serde(rename = "progressSeconds")]
        progress_seconds: f64,
    },
    /// The write would have decreased the stored value without an explicit
    /// restart override; nothing was written.
    RegressionBlocked {
        #[serde(rename = "currentSeconds")]
        current_seconds: f64,
    },
}

/// Repository for the content-progress collection.
pub struct ContentProgressRepository<'a> {
    store: &'a dyn CollectionStore,
}

impl<'a> ContentProgressRepository<'a> {
    /// Create a repository view over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn CollectionStore) -> Self {
        Self { store }
    }

    fn load_all(&self) -> Result<Vec<ContentProgress>> {
        self.store
            .get(keys::CONTENT_PROGRESS)?
            .iter()
            .map(|row| ContentProgress::from_value(row).map_err(Into::into))
            .collect()
    }

    /// The progress row for a `(user, content)` pair, if any.
    ///
    /// # Errors
    ///
    /// Propagates store failures and validation failures on stored rows.
    pub fn get(&self, user_id: &UserId, content_id: &ContentId) -> Result<Option<ContentProgress>> {
        let id = ProgressId::for_pair(user_id, content_id);
        Ok(self.load_all()?.into_iter().find(|row| row.id == id))
    }

    /// The user's most recently updated progress row, strictly validated.
    ///
    /// # Errors
    ///
    /// Propagates store failures and validation failures on stored rows.
    pub fn most_recent_for_user(&self, user_id: &UserId) -> Result<Option<ContentProgress>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|row| &row.user_id == user_id)
            .max_by_key(|row| row.updated_at))
    }

    /// The user's most recently updated raw row, without shape validation.
    ///
    /// The continue-watching resolver classifies malformed rows as a `stale`
    /// state instead of failing the whole read, so it needs the raw document.
    ///
    /// # Errors
    ///
    /// Propagates store failures only.
    pub fn most_recent_raw_for_user(&self, user_id: &UserId) -> Result<Option<Value>> {
        let rows = self.store.get(keys::CONTENT_PROGRESS)?;
        Ok(rows
            .into_iter()
            .filter(|row| row.get("userId").and_then(|v| v.as_str()) == Some(user_id.as_str()))
            .max_by_key(|row| {
                row.get("updatedAt")
                    .and_then(|v| v.as_str())
                    .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
                    .map(|dt| dt.with_timezone(&Utc))
                    // Unparsable timestamps sort oldest; the row can still
                    // win if it is the only one, and the resolver will then
                    // classify it as stale.
                    .unwrap_or(chrono::DateTime::UNIX_EPOCH)
            }))
    }

    /// Delta write: `next = max(0, current + delta)`. Always accepted —
    /// additive flows are monotonic by construction and clamped at zero.
    ///
    /// # Errors
    ///
    /// Rejects non-finite deltas; propagates store and validation failures.
    pub fn add_delta(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
        delta_seconds: f64,
    ) -> Result<ContentProgress> {
        if !delta_seconds.is_finite() {
            return Err(ValidationError::new("deltaSeconds", "finite number").into());
        }
        let row = self
            .write(user_id, content_id, |current| {
                Some((current.unwrap_or(0.0) + delta_seconds).max(0.0))
            })?
            .ok_or_else(|| ValidationError::new("<document>", "progress row after write"))?;
        Ok(row)
    }

    /// Absolute write with the regression guard: refuses to lower the stored
    /// value unless `allow_restart` is set, protecting against stale or
    /// out-of-order client writes silently erasing progress.
    ///
    /// # Errors
    ///
    /// Rejects non-finite or negative values; propagates store and
    /// validation failures.
    pub fn set_absolute(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
        progress_seconds: f64,
        allow_restart: bool,
    ) -> Result<ProgressWrite> {
        if !progress_seconds.is_finite() || progress_seconds < 0.0 {
            return Err(ValidationError::new("progressSeconds", "finite number >= 0").into());
        }

        // The guard runs inside the same lock acquisition as the write: a
        // separate read would let a concurrent writer raise the stored value
        // between the check and the overwrite.
        let mut blocked = None;
        let written = self.write(user_id, content_id, |current| {
            if let Some(current) = current
                && progress_seconds < current
                && !allow_restart
            {
                blocked = Some(current);
                return None;
            }
            Some(progress_seconds)
        })?;

        if let Some(current) = blocked {
            tracing::debug!(
                user = %user_id,
                content = %content_id,
                current,
                attempted = progress_seconds,
                "progress regression blocked"
            );
            return Ok(ProgressWrite::RegressionBlocked {
                current_seconds: current,
            });
        }
        let row = written
            .ok_or_else(|| ValidationError::new("<document>", "progress row after write"))?;
        Ok(ProgressWrite::Persisted {
            progress_seconds: row.progress_seconds,
        })
    }

    /// Upsert under one collection lock: `next` maps the current value (if
    /// the row exists) to the value to store, or `None` to leave the
    /// collection untouched.
    fn write(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
        mut next: impl FnMut(Option<f64>) -> Option<f64>,
    ) -> Result<Option<ContentProgress>> {
        let id = ProgressId::for_pair(user_id, content_id);
        let mut outcome: std::result::Result<Option<ContentProgress>, ValidationError> = Ok(None);

        self.store.update(keys::CONTENT_PROGRESS, &mut |mut rows| {
            let existing_idx = rows
                .iter()
                .position(|row| row.get("id").and_then(|v| v.as_str()) == Some(id.as_str()));

            let current = match existing_idx {
                None => None,
                Some(idx) => match rows.get(idx).map(|row| ContentProgress::from_value(row)) {
                    Some(Ok(parsed)) => Some(parsed.progress_seconds),
                    Some(Err(err)) => {
                        outcome = Err(err);
                        return rows;
                    }
                    None => None,
                },
            };

            let Some(value) = next(current) else {
                return rows;
            };
            let row = ContentProgress::new(
                user_id.clone(),
                content_id.clone(),
                value,
                Utc::now(),
            );
            let encoded = model::to_value(&row);
            match existing_idx {
                Some(idx) => {
                    if let Some(slot) = rows.get_mut(idx) {
                        *slot = encoded;
                    }
                }
                None => rows.push(encoded),
            }
            outcome = Ok(Some(row));
            rows
        })?;

        outcome.map_err(Into::into)
    }

    /// Drop every progress row belonging to a user (erasure cascade).
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn remove_all_for_user(&self, user_id: &UserId) -> Result<usize> {
        let mut dropped = 0;
        self.store.update(keys::CONTENT_PROGRESS, &mut |rows| {
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

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    fn ids() -> (UserId, ContentId) {
        (UserId::new("user-1"), ContentId::new("content-2"))
    }

    /// Lands a competing 100.0 write immediately before the first `update`
    /// on the progress collection acquires the lock.
    struct InterleavingStore {
        inner: MemoryStore,
        raced: AtomicBool,
    }

    impl InterleavingStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                raced: AtomicBool::new(false),
            }
        }
    }

    impl CollectionStore for InterleavingStore {
        fn get(&self, key: &str) -> std::result::Result<Vec<Value>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, rows: Vec<Value>) -> std::result::Result<(), StoreError> {
            self.inner.set(key, rows)
        }

        fn has(&self, key: &str) -> std::result::Result<bool, StoreError> {
            self.inner.has(key)
        }

        fn update(
            &self,
            key: &str,
            mutate: &mut dyn FnMut(Vec<Value>) -> Vec<Value>,
        ) -> std::result::Result<(), StoreError> {
            if key == keys::CONTENT_PROGRESS && !self.raced.swap(true, Ordering::SeqCst) {
                let (user, content) = ids();
                ContentProgressRepository::new(&self.inner)
                    .set_absolute(&user, &content, 100.0, false)
                    .unwrap();
            }
            self.inner.update(key, mutate)
        }
    }

    #[test]
    fn test_deltas_accumulate() {
        let store = MemoryStore::new();
        let repo = ContentProgressRepository::new(&store);
        let (user, content) = ids();

        repo.add_delta(&user, &content, 30.0).unwrap();
        let row = repo.add_delta(&user, &content, 45.0).unwrap();

        assert_eq!(row.progress_seconds, 75.0);
        assert_eq!(
            repo.get(&user, &content).unwrap().unwrap().progress_seconds,
            75.0
        );
    }

    #[test]
    fn test_delta_clamps_at_zero() {
        let store = MemoryStore::new();
        let repo = ContentProgressRepository::new(&store);
        let (user, content) = ids();

        repo.add_delta(&user, &content, 10.0).unwrap();
        let row = repo.add_delta(&user, &content, -50.0).unwrap();
        assert_eq!(row.progress_seconds, 0.0);
    }

    #[test]
    fn test_regression_blocked_without_override() {
        let store = MemoryStore::new();
        let repo = ContentProgressRepository::new(&store);
        let (user, content) = ids();

        repo.set_absolute(&user, &content, 50.0, false).unwrap();

        let blocked = repo.set_absolute(&user, &content, 10.0, false).unwrap();
        assert_eq!(
            blocked,
            ProgressWrite::RegressionBlocked {
                current_seconds: 50.0
            }
        );
        // stored value untouched
        assert_eq!(
            repo.get(&user, &content).unwrap().unwrap().progress_seconds,
            50.0
        );
    }

    #[test]
    fn test_restart_override_lowers_value() {
        let store = MemoryStore::new();
        let repo = ContentProgressRepository::new(&store);
        let (user, content) = ids();

        repo.set_absolute(&user, &content, 50.0, false).unwrap();
        let written = repo.set_absolute(&user, &content, 10.0, true).unwrap();
        assert_eq!(
            written,
            ProgressWrite::Persisted {
                progress_seconds: 10.0
            }
        );
    }

    #[test]
    fn test_guard_sees_writes_landing_just_before_the_lock() {
        let store = InterleavingStore::new();
        let repo = ContentProgressRepository::new(&store);
        let (user, content) = ids();

        // A concurrent writer persists 100.0 right before this write takes
        // the collection lock; the stale 10.0 must be blocked, not applied
        // over it.
        let outcome = repo.set_absolute(&user, &content, 10.0, false).unwrap();
        assert_eq!(
            outcome,
            ProgressWrite::RegressionBlocked {
                current_seconds: 100.0
            }
        );
        assert_eq!(
            repo.get(&user, &content).unwrap().unwrap().progress_seconds,
            100.0
        );
    }

    #[test]
    fn test_single_row_per_pair() {
        let store = MemoryStore::new();
        let repo = ContentProgressRepository::new(&store);
        let (user, content) = ids();

        repo.add_delta(&user, &content, 5.0).unwrap();
        repo.set_absolute(&user, &content, 99.0, false).unwrap();
        repo.add_delta(&user, &content, 1.0).unwrap();

        assert_eq!(store.get(keys::CONTENT_PROGRESS).unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let store = MemoryStore::new();
        let repo = ContentProgressRepository::new(&store);
        let (user, content) = ids();

        assert!(repo.add_delta(&user, &content, f64::NAN).is_err());
        assert!(repo.set_absolute(&user, &content, f64::INFINITY, false).is_err());
        assert!(repo.set_absolute(&user, &content, -1.0, true).is_err());
    }

    #[test]
    fn test_most_recent_for_user() {
        let store = MemoryStore::new();
        let repo = ContentProgressRepository::new(&store);
        let user = UserId::new("user-1");

        repo.add_delta(&user, &ContentId::new("content-a"), 10.0).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        repo.add_delta(&user, &ContentId::new("content-b"), 20.0).unwrap();

        let latest = repo.most_recent_for_user(&user).unwrap().unwrap();
        assert_eq!(latest.content_id.as_str(), "content-b");
    }
}
