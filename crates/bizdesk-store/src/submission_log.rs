//! # Submission Log
//!
//! Keeps the server response of the last successful submission per kind,
//! so the "view last document" screen can replay it after navigation or a
//! restart. Entries are opaque to this crate and are never edited.
//!
//! ```text
//! prepare_submission ──► backend ──► response JSON
//!                                        │
//!                                        ▼
//!                      record(response) → <kind>_current
//!                                        │
//!                                        ▼
//!                      last() ──► print / preview screen
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use bizdesk_core::DocumentKind;

use crate::backend::SharedBlobStore;
use crate::error::StoreResult;

/// A stored submission response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub kind: DocumentKind,
    pub submitted_at: DateTime<Utc>,
    pub response: Value,
}

/// Last-submission storage for one document kind.
#[derive(Debug, Clone)]
pub struct SubmissionLog {
    kind: DocumentKind,
    blobs: SharedBlobStore,
}

impl SubmissionLog {
    pub fn new(kind: DocumentKind, blobs: SharedBlobStore) -> Self {
        SubmissionLog { kind, blobs }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Stores `response` as the latest submission, timestamped now.
    pub fn record(&self, response: Value) -> StoreResult<SubmissionRecord> {
        self.record_at(response, Utc::now())
    }

    /// Stores `response` with an explicit timestamp.
    pub fn record_at(
        &self,
        response: Value,
        submitted_at: DateTime<Utc>,
    ) -> StoreResult<SubmissionRecord> {
        let record = SubmissionRecord {
            kind: self.kind,
            submitted_at,
            response,
        };

        let json = serde_json::to_string(&record)?;
        self.blobs.write(self.kind.submission_key(), &json)?;

        info!(kind = %self.kind, at = %submitted_at, "Submission recorded");
        Ok(record)
    }

    /// The latest stored submission, if there is a readable one.
    pub fn last(&self) -> Option<SubmissionRecord> {
        let raw = match self.blobs.read(self.kind.submission_key()) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(kind = %self.kind, error = %e, "Last submission unreadable");
                return None;
            }
        };

        match serde_json::from_str::<SubmissionRecord>(&raw) {
            Ok(record) if record.kind == self.kind => Some(record),
            Ok(record) => {
                warn!(kind = %self.kind, found = %record.kind, "Last submission has wrong kind, ignored");
                None
            }
            Err(e) => {
                warn!(kind = %self.kind, error = %e, "Last submission corrupt, ignored");
                None
            }
        }
    }

    pub fn forget(&self) -> StoreResult<()> {
        self.blobs.remove(self.kind.submission_key())
    }
}
