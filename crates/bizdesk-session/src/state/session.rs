//! # Session State
//!
//! Everything a view needs for the three document flows, built once from
//! [`SessionConfig`].
//!
//! ```text
//! SessionConfig
//!      │  storage.backend
//!      ▼
//! ┌──────────────────────────── SharedBlobStore ───────────────────────────┐
//! │   file: <data_dir>/<key>.json          memory: HashMap                 │
//! └───────┬──────────────────────┬──────────────────────┬──────────────────┘
//!         ▼                      ▼                      ▼
//!   DraftState(Order)     DraftState(Quotation)   DraftState(Purchase)
//!   SubmissionLog(Order)  SubmissionLog(Quot.)    SubmissionLog(Purchase)
//! ```

use std::sync::Arc;

use tracing::info;

use bizdesk_core::DocumentKind;
use bizdesk_store::{DraftStore, FileBlobStore, MemoryBlobStore, SharedBlobStore, SubmissionLog};

use super::DraftState;
use crate::config::{ConfigResult, SessionConfig, StorageBackend};

/// Draft and submission state for one user session.
#[derive(Debug, Clone)]
pub struct SessionState {
    config: SessionConfig,
    orders: DocumentSlot,
    quotations: DocumentSlot,
    purchases: DocumentSlot,
}

#[derive(Debug, Clone)]
struct DocumentSlot {
    draft: DraftState,
    log: SubmissionLog,
}

impl DocumentSlot {
    fn open(kind: DocumentKind, blobs: &SharedBlobStore) -> Self {
        DocumentSlot {
            draft: DraftState::new(DraftStore::open(kind, Arc::clone(blobs))),
            log: SubmissionLog::new(kind, Arc::clone(blobs)),
        }
    }
}

impl SessionState {
    /// Validates `config`, opens the configured storage backend and
    /// rehydrates every draft.
    pub fn open(config: SessionConfig) -> ConfigResult<Self> {
        config.validate()?;

        let blobs: SharedBlobStore = match config.storage.backend {
            StorageBackend::File => Arc::new(FileBlobStore::open(config.data_dir()?)?),
            StorageBackend::Memory => Arc::new(MemoryBlobStore::new()),
        };

        info!(backend = %config.storage.backend, "Session storage opened");
        Ok(Self::with_blobs(config, blobs))
    }

    /// Builds a session over an existing blob store.
    pub fn with_blobs(config: SessionConfig, blobs: SharedBlobStore) -> Self {
        SessionState {
            orders: DocumentSlot::open(DocumentKind::Order, &blobs),
            quotations: DocumentSlot::open(DocumentKind::Quotation, &blobs),
            purchases: DocumentSlot::open(DocumentKind::Purchase, &blobs),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn draft(&self, kind: DocumentKind) -> &DraftState {
        &self.slot(kind).draft
    }

    pub fn submissions(&self, kind: DocumentKind) -> &SubmissionLog {
        &self.slot(kind).log
    }

    fn slot(&self, kind: DocumentKind) -> &DocumentSlot {
        match kind {
            DocumentKind::Order => &self.orders,
            DocumentKind::Quotation => &self.quotations,
            DocumentKind::Purchase => &self.purchases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_each_kind_gets_its_own_state() {
        let session = SessionState::open(SessionConfig::in_memory()).unwrap();

        for kind in DocumentKind::ALL {
            assert_eq!(session.draft(kind).kind(), kind);
            assert_eq!(session.submissions(kind).kind(), kind);
        }
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let mut config = SessionConfig::in_memory();
        config.currency.decimals = 30;

        let err = SessionState::open(config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_file_backend_uses_data_dir() {
        let dir = std::env::temp_dir().join(format!("bizdesk-session-{}", std::process::id()));
        let mut config = SessionConfig::default();
        config.storage.data_dir = Some(dir.clone());

        let session = SessionState::open(config).unwrap();
        assert!(dir.is_dir());
        assert!(session.draft(DocumentKind::Order).with_store(|s| s.is_empty()));

        std::fs::remove_dir_all(dir).ok();
    }
}
