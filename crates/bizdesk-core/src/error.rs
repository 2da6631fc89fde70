//! # Error Types
//!
//! Domain-specific error types for bizdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bizdesk-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── SubmissionError  - Missing mandatory data at submission time      │
//! │                                                                         │
//! │  bizdesk-store errors (separate crate)                                 │
//! │  └── StoreError       - Blob storage failures                          │
//! │                                                                         │
//! │  bizdesk-session errors                                                │
//! │  └── ApiError         - What the views see (serialized, with a code)   │
//! │                                                                         │
//! │  Flow: ValidationError/SubmissionError → CoreError → ApiError → View   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::DocumentKind;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An order-only operation was invoked on another document kind.
    ///
    /// ## When This Occurs
    /// - Recording an advance payment on a quotation or purchase draft
    #[error("{operation} is not available for {kind} drafts")]
    NotSupported {
        kind: DocumentKind,
        operation: &'static str,
    },

    /// A document kind name could not be parsed.
    #[error("Unknown document kind: '{0}'")]
    UnknownDocumentKind(String),

    /// A monetary amount could not be parsed.
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// A line's `unit_price × quantity` does not fit in a [`Money`](crate::Money).
    ///
    /// ## When This Occurs
    /// - A stored draft was edited by hand or is corrupt
    #[error("Amounts of the line for product {product_id} are out of range")]
    LineAmountOverflow { product_id: i64 },

    /// The draft total or pending amount does not fit in a [`Money`](crate::Money).
    #[error("Draft total is out of range")]
    TotalOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The draft cannot be turned into a submission request yet.
    #[error("Draft is incomplete: {0}")]
    Submission(#[from] SubmissionError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by [`crate::validation`] before user input reaches a draft.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., lowercase currency code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The draft already holds the maximum number of lines.
    #[error("A draft cannot have more than {max} lines")]
    TooManyLines { max: usize },
}

// =============================================================================
// Submission Error
// =============================================================================

/// Named errors raised when a draft lacks data its document kind mandates.
///
/// Each variant has a stable machine-readable [`code`](SubmissionError::code)
/// the views switch on (`PAYMENT_REQUIRED`, `SUPPLIER_REQUIRED`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("A customer must be selected")]
    CustomerRequired,

    #[error("A supplier must be selected")]
    SupplierRequired,

    #[error("A warehouse must be selected")]
    WarehouseRequired,

    #[error("A payment method must be selected")]
    PaymentRequired,

    #[error("At least one product line is required")]
    ItemsRequired,
}

impl SubmissionError {
    /// Stable error code for programmatic handling.
    pub const fn code(&self) -> &'static str {
        match self {
            SubmissionError::CustomerRequired => "CUSTOMER_REQUIRED",
            SubmissionError::SupplierRequired => "SUPPLIER_REQUIRED",
            SubmissionError::WarehouseRequired => "WAREHOUSE_REQUIRED",
            SubmissionError::PaymentRequired => "PAYMENT_REQUIRED",
            SubmissionError::ItemsRequired => "ITEMS_REQUIRED",
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_supported_message() {
        let err = CoreError::NotSupported {
            kind: DocumentKind::Purchase,
            operation: "Advance payment",
        };
        assert_eq!(
            err.to_string(),
            "Advance payment is not available for purchase drafts"
        );
    }

    #[test]
    fn test_submission_codes() {
        assert_eq!(SubmissionError::PaymentRequired.code(), "PAYMENT_REQUIRED");
        assert_eq!(SubmissionError::SupplierRequired.code(), "SUPPLIER_REQUIRED");
        assert_eq!(SubmissionError::ItemsRequired.code(), "ITEMS_REQUIRED");
    }

    #[test]
    fn test_submission_converts_to_core_error() {
        let core_err: CoreError = SubmissionError::WarehouseRequired.into();
        assert!(matches!(
            core_err,
            CoreError::Submission(SubmissionError::WarehouseRequired)
        ));
    }
}
