//! # Draft Commands
//!
//! Editing commands for a document draft.
//!
//! ## Draft Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Lifecycle                                      │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│  Header  │────►│  Lines   │────►│ Submitted│       │
//! │  │  Draft   │     │   set    │     │  edited  │     │ (backend)│       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                   start_draft       add_line         complete_         │
//! │                   set_counterparty  update_line      submission        │
//! │                   set_warehouse     remove_line      (submission.rs)   │
//! │                   set_payment_      set_notes             │            │
//! │                   method            set_payment           │            │
//! │                        │                                  ▼            │
//! │                   clear_draft ─────────────────────► (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store accepts anything; quantity, price and notes limits are checked
//! here, before the draft is touched.

use tracing::debug;

use bizdesk_core::validation::{
    clamp_advance, validate_currency_code, validate_line_capacity, validate_notes,
    validate_quantity, validate_unit_price,
};
use bizdesk_core::{
    CoreError, DocumentKind, DraftHeader, DraftLine, LinePatch, Money, PartyRef, PaymentMethodRef,
    WarehouseRef,
};

use bizdesk_store::DraftStore;

use super::DraftResponse;
use crate::error::ApiError;
use crate::state::SessionState;

/// Gets the current draft of `kind`.
pub fn get_draft(session: &SessionState, kind: DocumentKind) -> DraftResponse {
    debug!(%kind, "get_draft command");
    session
        .draft(kind)
        .with_store(|s| DraftResponse::from_store(s, session.config()))
}

/// Starts a new document flow, discarding any current draft of `kind`.
///
/// A blank currency falls back to the configured one.
pub fn start_draft(
    session: &SessionState,
    kind: DocumentKind,
    mut header: DraftHeader,
) -> Result<DraftResponse, ApiError> {
    debug!(
        %kind,
        counterparty_id = header.counterparty.id,
        warehouse_id = header.warehouse.id,
        "start_draft command"
    );

    if header.currency.trim().is_empty() {
        header.currency = session.config().currency.code.clone();
    }
    validate_currency_code(&header.currency)?;

    Ok(session.draft(kind).with_store_mut(|s| {
        s.initialize(header);
        DraftResponse::from_store(s, session.config())
    }))
}

pub fn set_counterparty(
    session: &SessionState,
    kind: DocumentKind,
    counterparty: PartyRef,
) -> DraftResponse {
    debug!(%kind, counterparty_id = counterparty.id, "set_counterparty command");
    session.draft(kind).with_store_mut(|s| {
        s.update_counterparty(counterparty);
        DraftResponse::from_store(s, session.config())
    })
}

pub fn set_warehouse(
    session: &SessionState,
    kind: DocumentKind,
    warehouse: WarehouseRef,
) -> DraftResponse {
    debug!(%kind, warehouse_id = warehouse.id, "set_warehouse command");
    session.draft(kind).with_store_mut(|s| {
        s.update_warehouse(warehouse);
        DraftResponse::from_store(s, session.config())
    })
}

/// Sets the payment method of an order or purchase.
///
/// ## Errors
/// `NOT_SUPPORTED` for quotations, which carry no payment method.
pub fn set_payment_method(
    session: &SessionState,
    kind: DocumentKind,
    payment_method: PaymentMethodRef,
) -> Result<DraftResponse, ApiError> {
    debug!(%kind, payment_method_id = payment_method.id, "set_payment_method command");

    if !kind.uses_payment_method() {
        return Err(CoreError::NotSupported {
            kind,
            operation: "Payment method",
        }
        .into());
    }

    Ok(session.draft(kind).with_store_mut(|s| {
        s.update_payment_method(payment_method);
        DraftResponse::from_store(s, session.config())
    }))
}

/// Adds a product line.
///
/// ## Behavior
/// - Product already in the draft: nothing changes, the current draft is
///   returned (the view edits the existing line instead)
/// - Otherwise the line is appended with its subtotal recomputed
///
/// ## Errors
/// `VALIDATION_ERROR` for a quantity outside 1..=9999, a price that is
/// negative or above the price ceiling, over-long notes, a draft already at
/// its line limit, or a draft total that would leave the money range.
pub fn add_line(
    session: &SessionState,
    kind: DocumentKind,
    line: DraftLine,
) -> Result<DraftResponse, ApiError> {
    debug!(
        %kind,
        product_id = line.product_id,
        quantity = line.quantity,
        "add_line command"
    );

    validate_quantity(line.quantity)?;
    validate_unit_price(line.unit_price)?;
    if let Some(notes) = &line.notes {
        validate_notes(notes)?;
    }

    session.draft(kind).with_store_mut(|s| {
        if s.draft().contains(line.product_id) {
            return Ok(DraftResponse::from_store(s, session.config()));
        }
        validate_line_capacity(s.item_count())?;
        if !s.add_line(line) {
            return Err(CoreError::TotalOverflow.into());
        }
        Ok(DraftResponse::from_store(s, session.config()))
    })
}

/// Edits a line in place.
///
/// ## Errors
/// - `NOT_FOUND` if the product is not in the draft
/// - `VALIDATION_ERROR` for an invalid quantity, price or notes, or new
///   amounts that would leave the money range
pub fn update_line(
    session: &SessionState,
    kind: DocumentKind,
    product_id: i64,
    patch: LinePatch,
) -> Result<DraftResponse, ApiError> {
    debug!(%kind, product_id, ?patch, "update_line command");

    if let Some(quantity) = patch.quantity {
        validate_quantity(quantity)?;
    }
    if let Some(price) = patch.unit_price {
        validate_unit_price(price)?;
    }
    if let Some(notes) = &patch.notes {
        validate_notes(notes)?;
    }

    session.draft(kind).with_store_mut(|s| {
        if !s.draft().contains(product_id) {
            return Err(ApiError::not_found("Product line", product_id));
        }
        if !s.update_line(product_id, &patch) && differs_in_amounts(s, product_id, &patch) {
            return Err(CoreError::TotalOverflow.into());
        }
        Ok(DraftResponse::from_store(s, session.config()))
    })
}

// An update that changes nothing returns false as well; only a refused
// amount change leaves the line with values other than the patch's.
fn differs_in_amounts(store: &DraftStore, product_id: i64, patch: &LinePatch) -> bool {
    store.draft().line(product_id).is_some_and(|line| {
        patch.quantity.is_some_and(|q| q != line.quantity)
            || patch.unit_price.is_some_and(|p| p != line.unit_price)
    })
}

/// Removes a line; removing a product that is not there is a no-op.
pub fn remove_line(session: &SessionState, kind: DocumentKind, product_id: i64) -> DraftResponse {
    debug!(%kind, product_id, "remove_line command");
    session.draft(kind).with_store_mut(|s| {
        s.remove_line(product_id);
        DraftResponse::from_store(s, session.config())
    })
}

/// Replaces the document notes; blank text clears them.
pub fn set_notes(
    session: &SessionState,
    kind: DocumentKind,
    notes: String,
) -> Result<DraftResponse, ApiError> {
    debug!(%kind, len = notes.len(), "set_notes command");
    validate_notes(&notes)?;

    Ok(session.draft(kind).with_store_mut(|s| {
        s.update_notes(notes);
        DraftResponse::from_store(s, session.config())
    }))
}

/// Records the advance paid on an order.
///
/// The amount is kept within `[0, total]`; zero removes the advance.
///
/// ## Errors
/// `NOT_SUPPORTED` for quotations and purchases.
pub fn set_payment(
    session: &SessionState,
    kind: DocumentKind,
    amount: Money,
    user_id: i64,
) -> Result<DraftResponse, ApiError> {
    debug!(%kind, amount = %amount, user_id, "set_payment command");

    session.draft(kind).with_store_mut(|s| {
        let amount = clamp_advance(amount, s.totals().total);
        s.set_payment(amount, user_id)?;
        Ok(DraftResponse::from_store(s, session.config()))
    })
}

/// Discards the draft of `kind`.
///
/// ## When Used
/// - User cancels the document
/// - After a successful submission (see `complete_submission`)
pub fn clear_draft(session: &SessionState, kind: DocumentKind) -> DraftResponse {
    debug!(%kind, "clear_draft command");
    session.draft(kind).with_store_mut(|s| {
        s.clear();
        DraftResponse::from_store(s, session.config())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::error::ErrorCode;
    use bizdesk_store::{BlobStore, MemoryBlobStore};
    use std::sync::Arc;

    fn session() -> SessionState {
        SessionState::open(SessionConfig::in_memory()).unwrap()
    }

    fn line(product_id: i64, quantity: i64, price: i64) -> DraftLine {
        DraftLine::new(
            product_id,
            format!("SKU-{}", product_id),
            format!("Producto {}", product_id),
            "unidad",
            quantity,
            Money::from_minor(price),
        )
    }

    #[test]
    fn test_start_draft_defaults_currency() {
        let session = session();
        let header = DraftHeader {
            counterparty: PartyRef::new(5, "Cliente"),
            ..Default::default()
        };

        let response = start_draft(&session, DocumentKind::Quotation, header).unwrap();
        assert_eq!(response.draft.currency, "BOB");
        assert_eq!(response.draft.counterparty.id, 5);
    }

    #[test]
    fn test_start_draft_rejects_bad_currency() {
        let header = DraftHeader {
            currency: "bs".to_string(),
            ..Default::default()
        };
        let err = start_draft(&session(), DocumentKind::Order, header).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_add_line_validates_input() {
        let session = session();

        let err = add_line(&session, DocumentKind::Order, line(1, 0, 100)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_line(&session, DocumentKind::Order, line(1, 10_000, 100)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_line(&session, DocumentKind::Order, line(1, 1, -1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_line(&session, DocumentKind::Order, line(1, 9_999, i64::MAX / 2 + 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(get_draft(&session, DocumentKind::Order).item_count, 0);
    }

    #[test]
    fn test_update_line_rejects_price_above_ceiling() {
        let session = session();
        add_line(&session, DocumentKind::Order, line(1, 2, 500)).unwrap();

        let patch = LinePatch::new().unit_price(Money::from_minor(i64::MAX / 2 + 1));
        let err = update_line(&session, DocumentKind::Order, 1, patch).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let response = get_draft(&session, DocumentKind::Order);
        assert_eq!(response.totals.total, Money::from_minor(1000));
    }

    #[test]
    fn test_add_line_reports_total_out_of_range() {
        let blobs = MemoryBlobStore::new();
        let near_max = (i64::MAX - 10).to_string();
        blobs
            .write(
                "order_preview",
                &format!(r#"{{"lines":[{{"productId":1,"quantity":1,"unitPrice":{}}}]}}"#, near_max),
            )
            .unwrap();
        let session = SessionState::with_blobs(SessionConfig::in_memory(), Arc::new(blobs));

        let err = add_line(&session, DocumentKind::Order, line(2, 1, 100)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_draft(&session, DocumentKind::Order).item_count, 1);

        let err = update_line(&session, DocumentKind::Order, 1, LinePatch::new().quantity(2)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_duplicate_add_returns_unchanged_draft() {
        let session = session();
        let first = add_line(&session, DocumentKind::Order, line(1, 1, 1000)).unwrap();
        let second = add_line(&session, DocumentKind::Order, line(1, 7, 50)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_update_missing_line_is_not_found() {
        let err = update_line(
            &session(),
            DocumentKind::Purchase,
            99,
            LinePatch::new().quantity(2),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_response_formats_totals() {
        let session = session();
        add_line(&session, DocumentKind::Order, line(1, 3, 1250)).unwrap();
        let response = set_payment(&session, DocumentKind::Order, Money::from_minor(1000), 4).unwrap();

        assert_eq!(response.display.total, "Bs 37.50");
        assert_eq!(response.display.paid, "Bs 10.00");
        assert_eq!(response.display.pending, "Bs 27.50");
    }

    #[test]
    fn test_set_payment_is_capped_at_total() {
        let session = session();
        add_line(&session, DocumentKind::Order, line(1, 1, 500)).unwrap();

        let response = set_payment(&session, DocumentKind::Order, Money::from_minor(9000), 4).unwrap();
        assert_eq!(response.totals.paid, Money::from_minor(500));
        assert_eq!(response.totals.pending, Money::zero());
    }

    #[test]
    fn test_order_only_operations_are_rejected_elsewhere() {
        let session = session();

        let err = set_payment(&session, DocumentKind::Purchase, Money::from_minor(100), 4).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotSupported);

        let err = set_payment_method(
            &session,
            DocumentKind::Quotation,
            PaymentMethodRef::new(1, "EFE", "Efectivo"),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotSupported);
    }

    #[test]
    fn test_notes_too_long() {
        let err = set_notes(&session(), DocumentKind::Order, "x".repeat(501)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
