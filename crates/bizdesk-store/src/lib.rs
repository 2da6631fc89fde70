//! # bizdesk-store: Draft Persistence for BizDesk
//!
//! Keeps one live draft per document kind and writes it through to a named
//! blob storage after every change, so an accidental reload or restart picks
//! the draft up where it was left.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Draft Data Flow                                  │
//! │                                                                         │
//! │  Session command (add_line)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bizdesk-store (THIS CRATE)                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  DraftStore   │    │ SubmissionLog │    │  BlobStore   │  │   │
//! │  │   │ (one per kind)│───►│ (last result) │───►│  file/memory │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <data dir>/order_preview.json, purchase_preview.json, ...             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`backend`] - The [`BlobStore`] trait and its file/memory implementations
//! - [`draft_store`] - [`DraftStore`], the single writer of a draft
//! - [`submission_log`] - Replay of the last successful submission
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use bizdesk_core::{DocumentKind, DraftLine, Money};
//! use bizdesk_store::{DraftStore, MemoryBlobStore};
//!
//! let blobs = Arc::new(MemoryBlobStore::new());
//! let mut store = DraftStore::open(DocumentKind::Order, blobs.clone());
//! store.add_line(DraftLine::new(1, "CEM-50", "Cemento", "bolsa", 2, Money::from_minor(5200)));
//!
//! // A second store over the same blobs sees the persisted draft.
//! let reopened = DraftStore::open(DocumentKind::Order, blobs);
//! assert_eq!(reopened.draft().item_count(), 1);
//! ```

pub mod backend;
pub mod draft_store;
pub mod error;
pub mod submission_log;

pub use backend::{BlobStore, FileBlobStore, MemoryBlobStore, SharedBlobStore};
pub use draft_store::DraftStore;
pub use error::{StoreError, StoreResult};
pub use submission_log::{SubmissionLog, SubmissionRecord};
