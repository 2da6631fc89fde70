//! In-process blob storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{check_key, BlobStore};
use crate::error::{StoreError, StoreResult};

/// A `HashMap` behind a mutex.
///
/// Cloning yields another handle to the same entries, which is how tests
/// simulate a restart: drop the store, open a new one on a clone.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        check_key(key)?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        check_key(key)?;
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        check_key(key)?;
        self.lock()?.remove(key);
        Ok(())
    }
}
