//! # Blob Storage Backends
//!
//! A blob store maps a key (`order_preview`) to a string value (the JSON
//! draft). It is the only thing the draft store knows about persistence.
//!
//! ## Available Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BlobStore (trait)                                                      │
//! │     │                                                                   │
//! │     ├── MemoryBlobStore  - HashMap, lives as long as the process        │
//! │     │                      (tests, kiosk sessions)                      │
//! │     │                                                                   │
//! │     └── FileBlobStore    - <dir>/<key>.json, survives restarts          │
//! │                            (the local-storage equivalent)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod file;
mod memory;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;

use std::sync::Arc;

use crate::error::{StoreError, StoreResult};

/// Read/write access to named blobs.
///
/// Implementations must be safe to share between threads; the session layer
/// hands one backend to every draft store.
pub trait BlobStore: Send + Sync + std::fmt::Debug {
    /// Returns the blob stored under `key`, or `None` if there is none.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous blob.
    fn write(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes the blob under `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// A blob store shared by every draft store of a session.
pub type SharedBlobStore = Arc<dyn BlobStore>;

/// Rejects keys that could escape a storage directory.
pub(crate) fn check_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
