//! # Storage Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error / CoreError                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ├──► DraftStore: logged, never blocks the user                   │
//! │       │                                                                 │
//! │       └──► SubmissionLog callers: ApiError (STORAGE_ERROR)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use bizdesk_core::{CoreError, DocumentKind};

/// Blob storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the underlying file failed.
    ///
    /// ## When This Occurs
    /// - Data directory is not writable
    /// - Disk full
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A blob could not be encoded or decoded.
    #[error("Stored data is not valid JSON for this entry: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored draft blob is valid JSON but not a JSON object.
    #[error("Stored draft is not a JSON object")]
    NotAnObject,

    /// A stored draft names a different document kind than its key.
    #[error("Stored draft holds a {found} draft, expected {expected}")]
    KindMismatch {
        expected: DocumentKind,
        found: DocumentKind,
    },

    /// A stored draft parsed, but its amounts cannot be used.
    #[error("Stored draft is inconsistent: {0}")]
    InvalidDraft(#[from] CoreError),

    /// Keys become file names, so only `[A-Za-z0-9_-]` is accepted.
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),

    /// The storage backend cannot be used (e.g. a poisoned lock).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
