//! # File Blob Storage
//!
//! One `<key>.json` file per key inside a data directory.
//!
//! ## Write Path
//! ```text
//! write("order_preview", json)
//!      │
//!      ▼
//! <dir>/order_preview.json.tmp   ← full contents written here first
//!      │
//!      ▼ rename (atomic on the same filesystem)
//! <dir>/order_preview.json
//! ```
//! A crash mid-write leaves the previous blob intact instead of a
//! half-written one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{check_key, BlobStore};
use crate::error::StoreResult;

/// Blob storage backed by a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    /// Opens (and creates if needed) the storage directory.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        info!(root = %root.display(), "File blob store opened");
        Ok(FileBlobStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        check_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        debug!(key, bytes = value.len(), "Blob written");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key, "Blob removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
