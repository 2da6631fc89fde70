//! # Submission Commands
//!
//! The HTTP call itself belongs to the view layer. These commands bracket it:
//!
//! ```text
//! prepare_submission(kind, user) ──► SubmissionRequest JSON
//!                                         │
//!                                         ▼ view POSTs it
//!                                   backend response
//!                                         │
//!            ┌────────── success ─────────┴────────── failure ──────────┐
//!            ▼                                                          ▼
//! complete_submission(kind, response)                        draft left untouched,
//!   • response recorded as <kind>_current                    user can retry
//!   • draft cleared
//!            │
//!            ▼
//! last_submission(kind) ──► print / preview screen
//! ```

use serde_json::Value;
use tracing::{debug, info};

use bizdesk_core::{DocumentKind, SubmissionRequest};
use bizdesk_store::SubmissionRecord;

use crate::error::ApiError;
use crate::state::SessionState;

/// Builds the backend request for the current draft of `kind`.
///
/// ## Errors
/// The named code of the first missing mandatory field
/// (`CUSTOMER_REQUIRED`, `SUPPLIER_REQUIRED`, `WAREHOUSE_REQUIRED`,
/// `PAYMENT_REQUIRED`, `ITEMS_REQUIRED`).
pub fn prepare_submission(
    session: &SessionState,
    kind: DocumentKind,
    user_id: i64,
) -> Result<SubmissionRequest, ApiError> {
    debug!(%kind, user_id, "prepare_submission command");

    let request = session
        .draft(kind)
        .with_store(|s| s.to_submission_request(user_id))?;
    Ok(request)
}

/// Records a successful backend response and clears the draft.
pub fn complete_submission(
    session: &SessionState,
    kind: DocumentKind,
    response: Value,
) -> Result<SubmissionRecord, ApiError> {
    debug!(%kind, "complete_submission command");

    let record = session.submissions(kind).record(response)?;
    session.draft(kind).with_store_mut(|s| s.clear());

    info!(%kind, "Submission completed, draft cleared");
    Ok(record)
}

/// The last successful submission of `kind`, for replay.
///
/// ## Errors
/// `NOT_FOUND` when nothing was submitted yet (or the entry is unreadable).
pub fn last_submission(
    session: &SessionState,
    kind: DocumentKind,
) -> Result<SubmissionRecord, ApiError> {
    debug!(%kind, "last_submission command");

    session
        .submissions(kind)
        .last()
        .ok_or_else(|| ApiError::not_found("Submission", kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_empty_order_reports_customer_first() {
        let session = SessionState::open(SessionConfig::in_memory()).unwrap();
        let err = prepare_submission(&session, DocumentKind::Order, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::CustomerRequired);
    }

    #[test]
    fn test_last_submission_before_any_is_not_found() {
        let session = SessionState::open(SessionConfig::in_memory()).unwrap();
        let err = last_submission(&session, DocumentKind::Purchase).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_complete_submission_stamps_current_time() {
        let session = SessionState::open(SessionConfig::in_memory()).unwrap();

        let before = chrono::Utc::now();
        let record = complete_submission(&session, DocumentKind::Order, json!({"id": 1})).unwrap();
        let after = chrono::Utc::now();

        assert!(before <= record.submitted_at && record.submitted_at <= after);
        assert_eq!(
            last_submission(&session, DocumentKind::Order).unwrap().submitted_at,
            record.submitted_at
        );
    }

    #[test]
    fn test_complete_submission_records_and_clears() {
        let session = SessionState::open(SessionConfig::in_memory()).unwrap();
        session.draft(DocumentKind::Quotation).with_store_mut(|s| {
            s.update_notes("borrador");
        });

        complete_submission(&session, DocumentKind::Quotation, json!({"id": 3})).unwrap();

        assert_eq!(
            last_submission(&session, DocumentKind::Quotation)
                .unwrap()
                .response,
            json!({"id": 3})
        );
        assert!(session
            .draft(DocumentKind::Quotation)
            .with_store(|s| s.notes().is_none()));
    }
}
