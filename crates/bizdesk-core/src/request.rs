//! # Submission Requests
//!
//! Projects a [`Draft`] into the payload the backend expects when a draft
//! becomes a real document.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  View clicks "Save"                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SubmissionRequest::from_draft(&draft, user_id) ← THIS MODULE           │
//! │       │                                                                 │
//! │       ├── missing header/lines? → SubmissionError (PAYMENT_REQUIRED...) │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  HTTP collaborator POSTs the request (outside this workspace)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  On success the caller clears the draft                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The projection never mutates the draft.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::draft::{Draft, DraftLine};
use crate::error::SubmissionError;
use crate::money::Money;
use crate::types::{DocumentKind, HeaderRef};

/// One line of a submission request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RequestLine {
    pub product_id: i64,
    pub quantity: i64,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&DraftLine> for RequestLine {
    fn from(line: &DraftLine) -> Self {
        RequestLine {
            product_id: line.product_id,
            quantity: line.quantity,
            price: line.unit_price,
            notes: line.notes.clone().filter(|n| !n.trim().is_empty()),
        }
    }
}

/// Advance payment block of an order request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceRequest {
    pub amount: Money,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_id: i64,
    pub warehouse_id: i64,
    pub payment_method_id: i64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<RequestLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advance: Option<AdvanceRequest>,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuotationRequest {
    pub customer_id: i64,
    pub warehouse_id: i64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<RequestLine>,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub supplier_id: i64,
    pub warehouse_id: i64,
    pub payment_method_id: i64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<RequestLine>,
    pub user_id: i64,
}

/// Request payload for any document kind.
///
/// Serialized untagged: each variant produces exactly the JSON body its
/// backend endpoint accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum SubmissionRequest {
    Order(OrderRequest),
    Quotation(QuotationRequest),
    Purchase(PurchaseRequest),
}

impl SubmissionRequest {
    /// Builds the request for `draft`, acting as `user_id`.
    ///
    /// ## Mandatory Data
    /// ```text
    /// ┌────────────┬──────────────┬───────────┬────────────────┬───────────┐
    /// │ Kind       │ Counterparty │ Warehouse │ Payment method │ ≥ 1 line  │
    /// ├────────────┼──────────────┼───────────┼────────────────┼───────────┤
    /// │ Order      │ customer     │ yes       │ yes            │ yes       │
    /// │ Quotation  │ customer     │ yes       │ -              │ -         │
    /// │ Purchase   │ supplier     │ yes       │ yes            │ yes       │
    /// └────────────┴──────────────┴───────────┴────────────────┴───────────┘
    /// ```
    /// Checks run left to right; the first missing item is reported.
    pub fn from_draft(draft: &Draft, user_id: i64) -> Result<Self, SubmissionError> {
        check_mandatory(draft)?;

        let notes = draft.notes.clone().filter(|n| !n.trim().is_empty());
        let items: Vec<RequestLine> = draft.lines().iter().map(RequestLine::from).collect();

        let request = match draft.kind {
            DocumentKind::Order => SubmissionRequest::Order(OrderRequest {
                customer_id: draft.counterparty.id,
                warehouse_id: draft.warehouse.id,
                payment_method_id: draft.payment_method.id,
                currency: draft.currency.clone(),
                notes,
                items,
                advance: draft
                    .payment()
                    .filter(|p| p.amount.is_positive())
                    .map(|p| AdvanceRequest {
                        amount: p.amount,
                        user_id: p.actor_id,
                    }),
                user_id,
            }),
            DocumentKind::Quotation => SubmissionRequest::Quotation(QuotationRequest {
                customer_id: draft.counterparty.id,
                warehouse_id: draft.warehouse.id,
                currency: draft.currency.clone(),
                notes,
                items,
                user_id,
            }),
            DocumentKind::Purchase => SubmissionRequest::Purchase(PurchaseRequest {
                supplier_id: draft.counterparty.id,
                warehouse_id: draft.warehouse.id,
                payment_method_id: draft.payment_method.id,
                currency: draft.currency.clone(),
                notes,
                items,
                user_id,
            }),
        };

        Ok(request)
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            SubmissionRequest::Order(_) => DocumentKind::Order,
            SubmissionRequest::Quotation(_) => DocumentKind::Quotation,
            SubmissionRequest::Purchase(_) => DocumentKind::Purchase,
        }
    }

    pub fn items(&self) -> &[RequestLine] {
        match self {
            SubmissionRequest::Order(r) => &r.items,
            SubmissionRequest::Quotation(r) => &r.items,
            SubmissionRequest::Purchase(r) => &r.items,
        }
    }
}

fn check_mandatory(draft: &Draft) -> Result<(), SubmissionError> {
    if !draft.counterparty.is_set() {
        return Err(match draft.kind {
            DocumentKind::Purchase => SubmissionError::SupplierRequired,
            DocumentKind::Order | DocumentKind::Quotation => SubmissionError::CustomerRequired,
        });
    }

    if !draft.warehouse.is_set() {
        return Err(SubmissionError::WarehouseRequired);
    }

    if draft.kind == DocumentKind::Quotation {
        return Ok(());
    }

    if !draft.payment_method.is_set() {
        return Err(SubmissionError::PaymentRequired);
    }

    if draft.is_empty() {
        return Err(SubmissionError::ItemsRequired);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
