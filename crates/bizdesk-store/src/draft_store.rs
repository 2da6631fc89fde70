//! # Draft Store
//!
//! The single source of truth for one in-progress document draft.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Store Lifecycle                                │
//! │                                                                         │
//! │  open(kind, blobs)                                                      │
//! │      │  read <kind>_preview                                             │
//! │      ├── missing ─────────────► empty draft                             │
//! │      ├── unreadable/corrupt ──► empty draft (warn! logged)              │
//! │      └── valid ───────────────► rehydrated draft                        │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  initialize / add_line / update_line / remove_line / set_payment ...    │
//! │      │  each change: new snapshot + write-through to <kind>_preview    │
//! │      ▼                                                                  │
//! │  to_submission_request(user) ──► external HTTP collaborator             │
//! │      │                                                                  │
//! │      ▼ (caller, on success)                                             │
//! │  clear() ──► empty draft, <kind>_preview removed                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshots
//! The draft lives in an `Arc<Draft>`. [`DraftStore::snapshot`] hands out a
//! clone of that `Arc`; mutations go through `Arc::make_mut`, which copies
//! the draft first whenever a snapshot is still held elsewhere. A print
//! preview holding a snapshot therefore never sees later edits, and cannot
//! change the live draft.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use bizdesk_core::{
    CoreResult, DocumentKind, Draft, DraftHeader, DraftLine, DraftTotals, LinePatch, Money,
    PartyRef, PaymentMethodRef, SubmissionError, SubmissionRequest, WarehouseRef,
};

use crate::backend::SharedBlobStore;
use crate::error::{StoreError, StoreResult};

/// Owner of the live draft for one document kind.
///
/// Every mutation runs to completion synchronously and is written through
/// to the blob store before the call returns. Storage write failures are
/// logged and do not undo the in-memory change.
#[derive(Debug)]
pub struct DraftStore {
    kind: DocumentKind,
    blobs: SharedBlobStore,
    draft: Arc<Draft>,
}

impl DraftStore {
    /// Opens the store, rehydrating the persisted draft if there is a usable one.
    pub fn open(kind: DocumentKind, blobs: SharedBlobStore) -> Self {
        let draft = rehydrate(kind, &blobs);
        DraftStore {
            kind,
            blobs,
            draft: Arc::new(draft),
        }
    }

    // =========================================================================
    // Read Side
    // =========================================================================

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Borrow of the live draft, for derived read accessors.
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Immutable snapshot for print/preview consumers.
    pub fn snapshot(&self) -> Arc<Draft> {
        Arc::clone(&self.draft)
    }

    pub fn counterparty(&self) -> &PartyRef {
        &self.draft.counterparty
    }

    pub fn warehouse(&self) -> &WarehouseRef {
        &self.draft.warehouse
    }

    pub fn payment_method(&self) -> &PaymentMethodRef {
        &self.draft.payment_method
    }

    pub fn currency(&self) -> &str {
        &self.draft.currency
    }

    pub fn notes(&self) -> Option<&str> {
        self.draft.notes.as_deref()
    }

    pub fn lines(&self) -> &[DraftLine] {
        self.draft.lines()
    }

    pub fn item_count(&self) -> usize {
        self.draft.item_count()
    }

    pub fn total_quantity(&self) -> i64 {
        self.draft.total_quantity()
    }

    pub fn totals(&self) -> DraftTotals {
        self.draft.totals()
    }

    pub fn is_empty(&self) -> bool {
        self.draft.is_empty()
    }

    // =========================================================================
    // Header Operations
    // =========================================================================

    /// Starts a new document flow, discarding the current draft.
    pub fn initialize(&mut self, header: DraftHeader) {
        info!(
            kind = %self.kind,
            counterparty_id = header.counterparty.id,
            warehouse_id = header.warehouse.id,
            "Draft initialized"
        );
        self.draft = Arc::new(Draft::with_header(self.kind, header));
        self.persist("initialize");
    }

    pub fn update_counterparty(&mut self, counterparty: PartyRef) {
        self.apply("update_counterparty", |d| {
            d.set_counterparty(counterparty);
            true
        });
    }

    pub fn update_warehouse(&mut self, warehouse: WarehouseRef) {
        self.apply("update_warehouse", |d| {
            d.set_warehouse(warehouse);
            true
        });
    }

    pub fn update_payment_method(&mut self, payment_method: PaymentMethodRef) {
        self.apply("update_payment_method", |d| {
            d.set_payment_method(payment_method);
            true
        });
    }

    pub fn update_notes(&mut self, notes: impl Into<String>) {
        let notes = notes.into();
        self.apply("update_notes", |d| {
            d.set_notes(notes);
            true
        });
    }

    // =========================================================================
    // Line Operations
    // =========================================================================

    /// Adds a line; a product already in the draft is a silent no-op.
    ///
    /// Returns whether the line was added.
    pub fn add_line(&mut self, line: DraftLine) -> bool {
        let product_id = line.product_id;
        if self.draft.contains(product_id) {
            debug!(kind = %self.kind, product_id, "Product already in draft, add ignored");
            return false;
        }

        let added = self.apply("add_line", |d| d.add_line(line));
        if !added {
            warn!(kind = %self.kind, product_id, "Line amounts out of range, add refused");
        }
        added
    }

    /// Merges `patch` into the line for `product_id`.
    ///
    /// Returns whether the draft changed; unknown products are a no-op.
    pub fn update_line(&mut self, product_id: i64, patch: &LinePatch) -> bool {
        if !self.draft.contains(product_id) {
            debug!(kind = %self.kind, product_id, "Product not in draft, update ignored");
            return false;
        }
        self.apply("update_line", |d| d.update_line(product_id, patch))
    }

    /// Removes the line for `product_id`. Returns whether a line was removed.
    pub fn remove_line(&mut self, product_id: i64) -> bool {
        if !self.draft.contains(product_id) {
            return false;
        }
        self.apply("remove_line", |d| d.remove_line(product_id))
    }

    // =========================================================================
    // Payment
    // =========================================================================

    /// Records an order advance; see [`Draft::set_payment`].
    pub fn set_payment(&mut self, amount: Money, actor_id: i64) -> CoreResult<()> {
        let mut outcome = Ok(());
        self.apply("set_payment", |d| {
            outcome = d.set_payment(amount, actor_id);
            outcome.is_ok()
        });
        outcome
    }

    // =========================================================================
    // Reset & Submission
    // =========================================================================

    /// Resets to the canonical empty draft and deletes the persisted copy.
    pub fn clear(&mut self) {
        self.draft = Arc::new(Draft::empty(self.kind));

        match self.blobs.remove(self.kind.draft_key()) {
            Ok(()) => info!(kind = %self.kind, "Draft cleared"),
            Err(e) => error!(kind = %self.kind, error = %e, "Failed to remove persisted draft"),
        }
    }

    /// Projects the draft into the request for its document kind.
    ///
    /// Pure: the draft is not modified.
    pub fn to_submission_request(
        &self,
        user_id: i64,
    ) -> Result<SubmissionRequest, SubmissionError> {
        SubmissionRequest::from_draft(&self.draft, user_id).inspect_err(|e| {
            debug!(kind = %self.kind, code = e.code(), "Draft not ready for submission");
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Runs `op` on a private copy-on-write draft and persists if it changed.
    fn apply(&mut self, op: &'static str, f: impl FnOnce(&mut Draft) -> bool) -> bool {
        let changed = f(Arc::make_mut(&mut self.draft));
        if changed {
            debug!(kind = %self.kind, op, "Draft updated");
            self.persist(op);
        }
        changed
    }

    fn persist(&self, op: &'static str) {
        if let Err(e) = self.write_through() {
            error!(kind = %self.kind, op, error = %e, "Failed to persist draft");
        }
    }

    fn write_through(&self) -> StoreResult<()> {
        let json = serde_json::to_string(&*self.draft)?;
        self.blobs.write(self.kind.draft_key(), &json)
    }
}

// =============================================================================
// Rehydration
// =============================================================================

fn rehydrate(kind: DocumentKind, blobs: &SharedBlobStore) -> Draft {
    let raw = match blobs.read(kind.draft_key()) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(%kind, "No persisted draft, starting empty");
            return Draft::empty(kind);
        }
        Err(e) => {
            warn!(%kind, error = %e, "Persisted draft unreadable, starting empty");
            return Draft::empty(kind);
        }
    };

    match decode(kind, &raw) {
        Ok(mut draft) => {
            if draft.normalize() {
                warn!(%kind, "Persisted draft had inconsistent totals, recomputed");
            }
            info!(%kind, lines = draft.item_count(), "Draft rehydrated");
            draft
        }
        Err(e) => {
            warn!(%kind, error = %e, "Persisted draft corrupt, starting empty");
            Draft::empty(kind)
        }
    }
}

/// Parses a persisted blob into a draft of `kind`.
///
/// Blobs written before drafts carried their kind get it filled in from
/// the storage key. A blob that names a different kind, or whose amounts
/// overflow, is rejected.
fn decode(kind: DocumentKind, raw: &str) -> StoreResult<Draft> {
    let mut value: Value = serde_json::from_str(raw)?;

    value
        .as_object_mut()
        .ok_or(StoreError::NotAnObject)?
        .entry("kind")
        .or_insert_with(|| Value::String(kind.as_str().to_string()));

    let draft: Draft = serde_json::from_value(value)?;
    if draft.kind != kind {
        return Err(StoreError::KindMismatch {
            expected: kind,
            found: draft.kind,
        });
    }
    draft.check_amounts()?;
    Ok(draft)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BlobStore, MemoryBlobStore};
    use bizdesk_core::CoreError;

    fn store(kind: DocumentKind) -> (DraftStore, MemoryBlobStore) {
        let blobs = MemoryBlobStore::new();
        (DraftStore::open(kind, Arc::new(blobs.clone())), blobs)
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

    #[derive(Debug)]
    struct ReadOnlyBlobs;

    impl BlobStore for ReadOnlyBlobs {
        fn read(&self, _key: &str) -> StoreResult<Option<String>> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("read-only".to_string()))
        }

        fn remove(&self, _key: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("read-only".to_string()))
        }
    }

    #[test]
    fn test_every_change_is_written_through() {
        let (mut store, blobs) = store(DocumentKind::Order);
        store.add_line(line(1, 2, 500));

        let raw = blobs.read("order_preview").unwrap().unwrap();
        let persisted: Draft = serde_json::from_str(&raw).unwrap();
        assert_eq!(&persisted, store.draft());
    }

    #[test]
    fn test_noop_does_not_write() {
        let (mut store, blobs) = store(DocumentKind::Quotation);
        assert!(!store.update_line(5, &LinePatch::new().quantity(2)));
        assert!(!store.remove_line(5));
        assert!(blobs.is_empty());
    }

    #[test]
    fn test_snapshot_is_not_affected_by_later_edits() {
        let (mut store, _blobs) = store(DocumentKind::Order);
        store.add_line(line(1, 1, 1000));

        let snapshot = store.snapshot();
        store.update_line(1, &LinePatch::new().quantity(5));

        assert_eq!(snapshot.line(1).unwrap().quantity, 1);
        assert_eq!(store.lines()[0].quantity, 5);
    }

    #[test]
    fn test_clear_removes_persisted_copy() {
        let (mut store, blobs) = store(DocumentKind::Purchase);
        store.add_line(line(1, 1, 1000));
        store.update_notes("urgente");

        store.clear();

        assert_eq!(*store.snapshot(), Draft::empty(DocumentKind::Purchase));
        assert_eq!(blobs.read("purchase_preview").unwrap(), None);
    }

    #[test]
    fn test_write_failure_keeps_in_memory_change() {
        let mut store = DraftStore::open(DocumentKind::Order, Arc::new(ReadOnlyBlobs));
        assert!(store.add_line(line(1, 3, 100)));
        assert_eq!(store.totals().total, Money::from_minor(300));

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_payment_outside_orders_fails_without_writing() {
        let (mut store, blobs) = store(DocumentKind::Quotation);
        assert!(store.set_payment(Money::from_minor(100), 1).is_err());
        assert!(blobs.is_empty());
    }

    #[test]
    fn test_decode_fills_missing_kind() {
        let draft = decode(DocumentKind::Order, r#"{"currency":"BOB","lines":[]}"#).unwrap();
        assert_eq!(draft.kind, DocumentKind::Order);
    }

    #[test]
    fn test_decode_rejects_foreign_kind_and_garbage() {
        assert!(matches!(
            decode(DocumentKind::Order, r#"{"kind":"purchase"}"#),
            Err(StoreError::KindMismatch {
                expected: DocumentKind::Order,
                found: DocumentKind::Purchase,
            })
        ));
        assert!(matches!(
            decode(DocumentKind::Order, "[1,2,3]"),
            Err(StoreError::NotAnObject)
        ));
        assert!(matches!(
            decode(DocumentKind::Order, "{not json"),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_decode_rejects_overflowing_amounts() {
        let raw = r#"{"kind":"order","lines":[{"productId":1,"quantity":9223372036854775807,"unitPrice":2}]}"#;
        assert!(matches!(
            decode(DocumentKind::Order, raw),
            Err(StoreError::InvalidDraft(CoreError::LineAmountOverflow { product_id: 1 }))
        ));
    }

    #[test]
    fn test_add_line_with_overflowing_price_is_refused() {
        let (mut store, blobs) = store(DocumentKind::Order);
        let huge = Money::from_minor(i64::MAX / 2 + 1);

        assert!(!store.add_line(DraftLine::new(1, "X", "Grande", "unidad", 2, huge)));
        assert!(store.is_empty());
        assert!(blobs.is_empty());
    }

    #[test]
    fn test_update_line_with_overflowing_price_keeps_line() {
        let (mut store, _blobs) = store(DocumentKind::Order);
        store.add_line(line(1, 2, 500));

        let patch = LinePatch::new().unit_price(Money::from_minor(i64::MAX / 2 + 1));
        assert!(!store.update_line(1, &patch));

        let kept = &store.lines()[0];
        assert_eq!(kept.unit_price, Money::from_minor(500));
        assert_eq!(kept.subtotal, Money::from_minor(1000));
        assert_eq!(store.totals().total, Money::from_minor(1000));
    }
}
