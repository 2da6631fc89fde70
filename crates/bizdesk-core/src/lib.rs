//! # bizdesk-core: Pure Document Logic for BizDesk
//!
//! This crate holds the document draft model shared by the order, quotation
//! and purchase flows. Everything here is a pure function over values: no
//! storage, no network, no clocks.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BizDesk Draft Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Views (browser)                              │   │
//! │  │    Product picker ──► Draft table ──► Payment ──► Print        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bizdesk-session (commands)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bizdesk-store (DraftStore)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bizdesk-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   draft   │  │  request  │  │   │
//! │  │   │ PartyRef  │  │   Money   │  │   Draft   │  │ Submission│  │   │
//! │  │   │ Warehouse │  │           │  │ DraftLine │  │  Request  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Document kinds and header references
//! - [`money`] - Money type with integer arithmetic
//! - [`draft`] - The draft value and its line operations
//! - [`request`] - Projection of a draft into submission requests
//! - [`error`] - Domain error types
//! - [`validation`] - Input rules the views apply before touching a draft
//!
//! ## Example Usage
//!
//! ```rust
//! use bizdesk_core::{Draft, DraftLine, DocumentKind, LinePatch, Money};
//!
//! let mut draft = Draft::empty(DocumentKind::Quotation);
//! draft.add_line(DraftLine::new(1, "CEM-50", "Cement 50kg", "bag", 1, Money::from_minor(1000)));
//! draft.update_line(1, &LinePatch::new().quantity(3));
//!
//! assert_eq!(draft.totals().total, Money::from_minor(3000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod money;
pub mod request;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::{AdvancePayment, Draft, DraftHeader, DraftLine, DraftTotals, LinePatch};
pub use error::{CoreError, CoreResult, SubmissionError, ValidationError};
pub use money::Money;
pub use request::{
    AdvanceRequest, OrderRequest, PurchaseRequest, QuotationRequest, RequestLine,
    SubmissionRequest,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency code used by an empty draft until a flow initializes it.
pub const DEFAULT_CURRENCY: &str = "BOB";

/// Maximum number of distinct products in a single draft.
///
/// Enforced by the command layer, not by [`Draft`] itself.
pub const MAX_DRAFT_LINES: usize = 200;

/// Maximum quantity accepted for one line.
pub const MAX_LINE_QUANTITY: i64 = 9_999;

/// Maximum unit price in minor units (999,999,999.99).
///
/// With [`MAX_LINE_QUANTITY`] and [`MAX_DRAFT_LINES`] this keeps every
/// subtotal and draft total far inside the `i64` range.
pub const MAX_UNIT_PRICE: i64 = 99_999_999_999;

/// Maximum length of free-text notes (document or line).
pub const MAX_NOTES_LENGTH: usize = 500;
