//! Keyed collection store.
//!
//! The backing document database is modeled as named, ordered collections of
//! JSON documents addressable by a persistence key. `set` fully replaces the
//! stored sequence; there are no transactions. Callers that read-modify-write
//! must go through [`CollectionStore::update`], which holds the collection's
//! lock across the whole logical operation — the multi-threaded analogue of
//! the original single-threaded cooperative model.
//!
//! Two implementations ship: [`MemoryStore`] for tests and ephemeral runs,
//! and [`JsonFileStore`], the durable local backend (one `<key>.json` file
//! per collection under a data directory).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde_json::Value;

use crate::error::StoreError;

/// Persistence keys for the named collections.
///
/// The `hh_` prefix matches the keys the shipped application already wrote,
/// so a durable store opened over existing data keeps working.
pub mod keys {
    pub const USERS: &str = "hh_users";
    pub const CONTENT: &str = "hh_content";
    pub const SAVED_CONTENT: &str = "hh_saved";
    pub const CONTENT_PROGRESS: &str = "hh_progress";
    pub const REQUESTS: &str = "hh_requests";
    pub const ERASURES: &str = "hh_erasures";
    pub const CONSENTS: &str = "hh_consents";

    /// Every collection key, for inspection tooling.
    pub const ALL: &[&str] = &[
        USERS,
        CONTENT,
        SAVED_CONTENT,
        CONTENT_PROGRESS,
        REQUESTS,
        ERASURES,
        CONSENTS,
    ];
}

/// Get/set access to durable, named, ordered collections of JSON documents.
///
/// Contract: `get` of an absent key yields an empty sequence, `set` fully
/// replaces the stored sequence, and `update` performs the closure as one
/// atomic read-modify-write on the collection.
pub trait CollectionStore: Send + Sync {
    /// Read the full sequence stored under `key` (empty if absent).
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Vec<Value>, StoreError>;

    /// Replace the sequence stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be written.
    fn set(&self, key: &str, rows: Vec<Value>) -> Result<(), StoreError>;

    /// Whether a sequence has ever been stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be read.
    fn has(&self, key: &str) -> Result<bool, StoreError>;

    /// Atomically read-modify-write the sequence under `key`.
    ///
    /// The collection lock is held for the duration of `mutate`, so no other
    /// logical operation can interleave with the read and the write.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be read or written.
    fn update(
        &self,
        key: &str,
        mutate: &mut dyn FnMut(Vec<Value>) -> Vec<Value>,
    ) -> Result<(), StoreError>;
}

/// Ephemeral in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CollectionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<Value>, StoreError> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(collections.get(key).cloned().unwrap_or_default())
    }

    fn set(&self, key: &str, rows: Vec<Value>) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        collections.insert(key.to_owned(), rows);
        Ok(())
    }

    fn has(&self, key: &str) -> Result<bool, StoreError> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(collections.contains_key(key))
    }

    fn update(
        &self,
        key: &str,
        mutate: &mut dyn FnMut(Vec<Value>) -> Vec<Value>,
    ) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let current = collections.get(key).cloned().unwrap_or_default();
        collections.insert(key.to_owned(), mutate(current));
        Ok(())
    }
}

/// Durable local store: one `<key>.json` file per collection under a data
/// directory, with a write-through in-memory cache.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    cache: RwLock<HashMap<String, Vec<Value>>>,
}

impl JsonFileStore {
    /// Open (and create if needed) a file store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self {
            dir,
            cache: RwLock::new(HashMap::new()),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read_file(&self, key: &str) -> Result<Option<Vec<Value>>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(|source| StoreError::Io {
            key: key.to_owned(),
            source,
        })?;
        let rows = serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            key: key.to_owned(),
            source,
        })?;
        Ok(Some(rows))
    }

    fn write_file(&self, key: &str, rows: &[Value]) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(rows).map_err(|source| StoreError::Corrupt {
            key: key.to_owned(),
            source,
        })?;
        // Write via a sibling temp file so a crash never leaves a torn file.
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, body)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|source| StoreError::Io {
                key: key.to_owned(),
                source,
            })
    }

    fn load_into_cache(
        &self,
        cache: &mut HashMap<String, Vec<Value>>,
        key: &str,
    ) -> Result<(), StoreError> {
        if !cache.contains_key(key) {
            if let Some(rows) = self.read_file(key)? {
                cache.insert(key.to_owned(), rows);
            }
        }
        Ok(())
    }

    /// The data directory this store persists into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CollectionStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Vec<Value>, StoreError> {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        self.load_into_cache(&mut cache, key)?;
        Ok(cache.get(key).cloned().unwrap_or_default())
    }

    fn set(&self, key: &str, rows: Vec<Value>) -> Result<(), StoreError> {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        self.write_file(key, &rows)?;
        cache.insert(key.to_owned(), rows);
        Ok(())
    }

    fn has(&self, key: &str) -> Result<bool, StoreError> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        Ok(cache.contains_key(key) || self.path_for(key).exists())
    }

    fn update(
        &self,
        key: &str,
        mutate: &mut dyn FnMut(Vec<Value>) -> Vec<Value>,
    ) -> Result<(), StoreError> {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        self.load_into_cache(&mut cache, key)?;
        let current = cache.get(key).cloned().unwrap_or_default();
        let next = mutate(current);
        self.write_file(key, &next)?;
        cache.insert(key.to_owned(), next);
        Ok(())
    }
}
