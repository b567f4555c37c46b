//! Round-trips named collections between memory and a [`KeyValueStore`].
//!
//! # Invariants
//! - `load` never fails: unreadable or unparsable data is logged and treated
//!   as "no data".
//! - `save` never fails: a rejected write is logged and dropped; the caller's
//!   in-memory state is untouched.
//! - `load(key)` after `save(key, items)` yields `items`, with dates equal to
//!   millisecond precision.

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, error, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::file::FileKeyValueStore;
use crate::repository::{InMemoryKeyValueStore, KeyValueStore, StorageError};

/// Generic load/save of JSON arrays over a shared key-value backend.
#[derive(Clone)]
pub struct PersistentStore {
    backend: Arc<dyn KeyValueStore>,
}

impl PersistentStore {
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// A store over a fresh [`InMemoryKeyValueStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryKeyValueStore::new()))
    }

    /// A store over a [`FileKeyValueStore`] rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn file(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        Ok(Self::new(Arc::new(FileKeyValueStore::open(dir)?)))
    }

    #[must_use]
    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.backend
    }

    /// Strict load: `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend read fails or the stored text is
    /// not a JSON array of `T`.
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Vec<T>>, StorageError> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(None);
        };
        let items = serde_json::from_str(&raw)?;
        Ok(Some(items))
    }

    /// Load the collection at `key`, or an empty one if there is no usable data.
    #[must_use]
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.load_or(key, Vec::new)
    }

    /// Load the collection at `key`, falling back to `seed` when the key is
    /// absent or its contents cannot be read.
    ///
    /// A stored empty array is data: it does not trigger the seed.
    pub fn load_or<T, F>(&self, key: &str, seed: F) -> Vec<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Vec<T>,
    {
        match self.try_load(key) {
            Ok(Some(items)) => {
                debug!(
                    "event=storage_load module=storage status=ok key={key} count={}",
                    items.len()
                );
                items
            }
            Ok(None) => {
                debug!("event=storage_load module=storage status=absent key={key}");
                seed()
            }
            Err(err) => {
                warn!("event=storage_load module=storage status=error key={key} error={err}");
                seed()
            }
        }
    }

    /// Strict save.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the backend write fails.
    pub fn try_save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;
        self.backend.set(key, &raw)
    }

    /// Save `items` at `key`. Returns whether the write was persisted; a
    /// failure is logged, never propagated.
    pub fn save<T: Serialize>(&self, key: &str, items: &[T]) -> bool {
        match self.try_save(key, items) {
            Ok(()) => {
                debug!(
                    "event=storage_save module=storage status=ok key={key} count={}",
                    items.len()
                );
                true
            }
            Err(err) => {
                error!("event=storage_save module=storage status=error key={key} error={err}");
                false
            }
        }
    }

    /// Delete the collection at `key`. Failures are logged.
    pub fn clear(&self, key: &str) -> bool {
        match self.backend.remove(key) {
            Ok(()) => true,
            Err(err) => {
                error!("event=storage_clear module=storage status=error key={key} error={err}");
                false
            }
        }
    }
}
