//! # API Error Type
//!
//! Unified error type returned by every session command.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in BizDesk                                │
//! │                                                                         │
//! │  View                        Session Command                           │
//! │  ────                        ───────────────                           │
//! │                                                                         │
//! │  prepareSubmission('order')                                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Input invalid? ── ValidationError ─────────────┐               │  │
//! │  │         │                                        │               │  │
//! │  │         ▼                                        ▼               │  │
//! │  │  Draft incomplete? ── SubmissionError ──────── ApiError ───────►│  │
//! │  │         │                                        ▲               │  │
//! │  │         ▼                                        │               │  │
//! │  │  Storage failed? ── StoreError ─────────────────┘               │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  switch (e.code) {                                                     │
//! │    case 'PAYMENT_REQUIRED': highlight the payment selector             │
//! │    case 'ITEMS_REQUIRED':   focus the product search                   │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use ts_rs::TS;

use bizdesk_core::{CoreError, SubmissionError, ValidationError};
use bizdesk_store::StoreError;

/// Error returned from session commands.
///
/// ```json
/// {
///   "code": "WAREHOUSE_REQUIRED",
///   "message": "A warehouse must be selected"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Order or quotation has no customer
    CustomerRequired,

    /// Purchase has no supplier
    SupplierRequired,

    WarehouseRequired,

    /// Order or purchase has no payment method
    PaymentRequired,

    /// Order or purchase has no lines
    ItemsRequired,

    /// Input validation failed
    ValidationError,

    /// Persisting or reading a blob failed
    StorageError,

    /// Operation does not apply to this document kind
    NotSupported,

    /// Product line or record not found
    NotFound,

    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        let code = match err {
            SubmissionError::CustomerRequired => ErrorCode::CustomerRequired,
            SubmissionError::SupplierRequired => ErrorCode::SupplierRequired,
            SubmissionError::WarehouseRequired => ErrorCode::WarehouseRequired,
            SubmissionError::PaymentRequired => ErrorCode::PaymentRequired,
            SubmissionError::ItemsRequired => ErrorCode::ItemsRequired,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotSupported { .. } => ApiError::new(ErrorCode::NotSupported, err.to_string()),
            CoreError::UnknownDocumentKind(_)
            | CoreError::InvalidAmount { .. }
            | CoreError::LineAmountOverflow { .. }
            | CoreError::TotalOverflow => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => e.into(),
            CoreError::Submission(e) => e.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // The path or parser detail is for the log, not the view.
        tracing::error!("Storage operation failed: {}", err);
        ApiError::new(ErrorCode::StorageError, "Local storage operation failed")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
