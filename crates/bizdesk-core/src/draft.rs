//! # Draft
//!
//! The in-progress business document and the operations that change it.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Operations                                     │
//! │                                                                         │
//! │  View Action              Draft Method            Derived State         │
//! │  ───────────              ────────────            ─────────────         │
//! │                                                                         │
//! │  Pick product ──────────► add_line() ───────────► totals               │
//! │                                                                         │
//! │  Edit qty/price ────────► update_line() ────────► subtotal, totals     │
//! │                                                                         │
//! │  Click remove ──────────► remove_line() ────────► totals               │
//! │                                                                         │
//! │  Enter advance ─────────► set_payment() ────────► paid, pending        │
//! │                                                                         │
//! │  NOTE: derived fields are recomputed inside the same call.              │
//! │        They are never written from outside this module.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product_id`
//! - `line.subtotal == line.unit_price × line.quantity`
//! - `totals.total == Σ line.subtotal`
//! - `totals.pending == totals.total - totals.paid`

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{DocumentKind, DraftStatus, PartyRef, PaymentMethodRef, WarehouseRef};
use crate::DEFAULT_CURRENCY;

// =============================================================================
// Draft Line
// =============================================================================

/// One product entry within a draft.
///
/// `name` is an editable copy of the catalog name: a quotation may describe
/// the product differently from the catalog without touching the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DraftLine {
    pub product_id: i64,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub name: String,
    /// Unit of measure ("unit", "bag", "kg", ...).
    #[serde(default)]
    pub unit: String,
    pub quantity: i64,
    pub unit_price: Money,
    #[serde(default)]
    pub subtotal: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DraftLine {
    /// Creates a line with its subtotal already computed.
    pub fn new(
        product_id: i64,
        sku: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        quantity: i64,
        unit_price: Money,
    ) -> Self {
        DraftLine {
            product_id,
            sku: sku.into(),
            name: name.into(),
            unit: unit.into(),
            quantity,
            unit_price,
            subtotal: unit_price.multiply_quantity(quantity),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = non_empty(notes.into());
        self
    }

    /// `unit_price × quantity`, regardless of the stored subtotal.
    #[inline]
    pub fn computed_subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// `unit_price × quantity`, or `None` if it does not fit in [`Money`].
    #[inline]
    pub fn checked_subtotal(&self) -> Option<Money> {
        self.unit_price.checked_multiply_quantity(self.quantity)
    }

    fn recompute_subtotal(&mut self) {
        self.subtotal = self.computed_subtotal();
    }

    /// Merges a patch into the line. Returns whether anything changed.
    ///
    /// A patch whose quantity and price overflow the subtotal is refused as a
    /// whole: no field is written and `false` is returned.
    fn apply(&mut self, patch: &LinePatch) -> bool {
        let subtotal = if patch.touches_amounts() {
            let quantity = patch.quantity.unwrap_or(self.quantity);
            let unit_price = patch.unit_price.unwrap_or(self.unit_price);
            match unit_price.checked_multiply_quantity(quantity) {
                Some(subtotal) => subtotal,
                None => return false,
            }
        } else {
            self.subtotal
        };

        let before = self.clone();

        if let Some(sku) = &patch.sku {
            self.sku = sku.clone();
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(unit) = &patch.unit {
            self.unit = unit.clone();
        }
        if let Some(notes) = &patch.notes {
            self.notes = non_empty(notes.clone());
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(unit_price) = patch.unit_price {
            self.unit_price = unit_price;
        }
        self.subtotal = subtotal;

        *self != before
    }
}

// =============================================================================
// Line Patch
// =============================================================================

/// Partial changes to a line. `None` fields are left as they are.
///
/// `notes: Some("")` clears the line notes.
///
/// ## Example
/// ```rust
/// use bizdesk_core::{LinePatch, Money};
///
/// let patch = LinePatch::new().quantity(3).unit_price(Money::from_minor(1250));
/// assert!(patch.touches_amounts());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct LinePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LinePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn unit_price(mut self, unit_price: Money) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Whether the patch changes quantity or price (and so the subtotal).
    pub fn touches_amounts(&self) -> bool {
        self.quantity.is_some() || self.unit_price.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == LinePatch::default()
    }
}

// =============================================================================
// Totals & Payment
// =============================================================================

/// Derived money block of a draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftTotals {
    pub total: Money,
    pub paid: Money,
    pub pending: Money,
}

/// An advance recorded against an order draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdvancePayment {
    pub amount: Money,
    /// User who registered the advance.
    pub actor_id: i64,
}

// =============================================================================
// Draft Header
// =============================================================================

/// Header fields a new document flow starts with.
///
/// `payment_method` is ignored for kinds that do not use one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DraftHeader {
    pub counterparty: PartyRef,
    pub warehouse: WarehouseRef,
    pub currency: String,
    #[serde(default)]
    pub payment_method: Option<PaymentMethodRef>,
}

// =============================================================================
// Draft
// =============================================================================

/// An unsubmitted order, quotation or purchase.
///
/// Header fields are public; lines, totals and payment are derived state and
/// only change through the methods below, which keep the invariants listed
/// in the module docs.
///
/// ## Persisted Shape
/// ```json
/// {
///   "kind": "order",
///   "status": "draft",
///   "currency": "BOB",
///   "counterparty": { "id": 12, "name": "Constructora Illimani" },
///   "warehouse": { "id": 1, "code": "ALM-01", "name": "Central" },
///   "paymentMethod": { "id": 2, "code": "EF", "name": "Efectivo" },
///   "lines": [ { "productId": 5, "quantity": 2, "unitPrice": 5200, "subtotal": 10400, ... } ],
///   "totals": { "total": 10400, "paid": 0, "pending": 10400 }
/// }
/// ```
/// Fields absent from older blobs (`paymentMethod`, `payment`, `paid`,
/// `pending`, `notes`) default on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub kind: DocumentKind,
    #[serde(default)]
    pub status: DraftStatus,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub counterparty: PartyRef,
    #[serde(default)]
    pub warehouse: WarehouseRef,
    #[serde(default)]
    pub payment_method: PaymentMethodRef,
    #[serde(default)]
    lines: Vec<DraftLine>,
    #[serde(default)]
    totals: DraftTotals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payment: Option<AdvancePayment>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn checked_sum(amounts: impl Iterator<Item = Money>) -> Option<Money> {
    amounts.fold(Some(Money::zero()), |acc, m| acc?.checked_add(m))
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

impl Draft {
    /// The canonical empty draft: unset header ids, no lines, zero totals.
    pub fn empty(kind: DocumentKind) -> Self {
        Draft {
            kind,
            status: DraftStatus::Draft,
            currency: default_currency(),
            notes: None,
            counterparty: PartyRef::default(),
            warehouse: WarehouseRef::default(),
            payment_method: PaymentMethodRef::default(),
            lines: Vec::new(),
            totals: DraftTotals::default(),
            payment: None,
        }
    }

    /// A fresh draft for a new document flow.
    pub fn with_header(kind: DocumentKind, header: DraftHeader) -> Self {
        let mut draft = Draft::empty(kind);
        draft.counterparty = header.counterparty;
        draft.warehouse = header.warehouse;
        if !header.currency.trim().is_empty() {
            draft.currency = header.currency;
        }
        if kind.uses_payment_method() {
            draft.payment_method = header.payment_method.unwrap_or_default();
        }
        draft
    }

    // -------------------------------------------------------------------------
    // Read Accessors
    // -------------------------------------------------------------------------

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    pub fn line(&self, product_id: i64) -> Option<&DraftLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn contains(&self, product_id: i64) -> bool {
        self.line(product_id).is_some()
    }

    pub fn totals(&self) -> DraftTotals {
        self.totals
    }

    pub fn payment(&self) -> Option<&AdvancePayment> {
        self.payment.as_ref()
    }

    /// Number of distinct products.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities over all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines
            .iter()
            .fold(0_i64, |acc, l| acc.saturating_add(l.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    // -------------------------------------------------------------------------
    // Header Updates
    // -------------------------------------------------------------------------

    pub fn set_counterparty(&mut self, counterparty: PartyRef) {
        self.counterparty = counterparty;
    }

    pub fn set_warehouse(&mut self, warehouse: WarehouseRef) {
        self.warehouse = warehouse;
    }

    pub fn set_payment_method(&mut self, payment_method: PaymentMethodRef) {
        self.payment_method = payment_method;
    }

    /// Replaces the document notes; blank text clears them.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = non_empty(notes.into());
    }

    // -------------------------------------------------------------------------
    // Line Operations
    // -------------------------------------------------------------------------

    /// Appends a line unless its product is already present.
    ///
    /// ## Behavior
    /// - Product already in draft: silent no-op, returns `false`. Picking a
    ///   product twice never merges quantities; the view edits the existing
    ///   line instead.
    /// - Subtotal or draft total would not fit in [`Money`]: refused, returns
    ///   `false`.
    /// - Otherwise: the subtotal is normalized to `unit_price × quantity`,
    ///   the line is appended and totals recomputed. Returns `true`.
    pub fn add_line(&mut self, mut line: DraftLine) -> bool {
        if self.contains(line.product_id) {
            return false;
        }

        let Some(subtotal) = line.checked_subtotal() else {
            return false;
        };
        let subtotals = self.lines.iter().map(|l| l.subtotal);
        if checked_sum(subtotals.chain(std::iter::once(subtotal))).is_none() {
            return false;
        }

        line.subtotal = subtotal;
        line.notes = line.notes.and_then(non_empty);
        self.lines.push(line);
        self.recompute_totals();
        true
    }

    /// Merges `patch` into the line for `product_id`.
    ///
    /// Returns `false` without touching anything when the product is not in
    /// the draft, the patch changes nothing, or the new amounts would not fit
    /// in [`Money`].
    pub fn update_line(&mut self, product_id: i64, patch: &LinePatch) -> bool {
        let Some(index) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return false;
        };

        let mut updated = self.lines[index].clone();
        if !updated.apply(patch) {
            return false;
        }

        let others = self
            .lines
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, l)| l.subtotal);
        if checked_sum(others.chain(std::iter::once(updated.subtotal))).is_none() {
            return false;
        }

        self.lines[index] = updated;
        self.recompute_totals();
        true
    }

    /// Removes the line for `product_id`. Returns whether a line was removed.
    pub fn remove_line(&mut self, product_id: i64) -> bool {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == initial_len {
            return false;
        }
        self.recompute_totals();
        true
    }

    // -------------------------------------------------------------------------
    // Payment
    // -------------------------------------------------------------------------

    /// Records an advance on an order draft.
    ///
    /// ## Behavior
    /// - Negative amounts are clamped to zero
    /// - Zero clears the advance record instead of storing a zero entry
    /// - `paid` and `pending` are recomputed
    ///
    /// Keeping the amount within the document total is up to the caller.
    ///
    /// ## Errors
    /// [`CoreError::NotSupported`] for quotations and purchases.
    pub fn set_payment(&mut self, amount: Money, actor_id: i64) -> CoreResult<()> {
        if !self.kind.accepts_advance() {
            return Err(CoreError::NotSupported {
                kind: self.kind,
                operation: "Advance payment",
            });
        }

        let amount = amount.clamp_non_negative();
        self.payment = if amount.is_zero() {
            None
        } else {
            Some(AdvancePayment { amount, actor_id })
        };
        self.recompute_totals();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Derived State
    // -------------------------------------------------------------------------

    fn recompute_totals(&mut self) {
        let total: Money = self.lines.iter().map(|l| l.subtotal).sum();
        let paid = self.payment.map(|p| p.amount).unwrap_or_default();

        self.totals = DraftTotals {
            total,
            paid,
            pending: total - paid,
        };
    }

    /// Verifies that every amount derived from the lines and the payment fits
    /// in [`Money`].
    ///
    /// Drafts built through [`add_line`](Draft::add_line) and
    /// [`update_line`](Draft::update_line) always pass. A parsed blob may not,
    /// and must be checked before it is used.
    ///
    /// ## Errors
    /// - [`CoreError::LineAmountOverflow`] for the first line whose subtotal
    ///   overflows
    /// - [`CoreError::TotalOverflow`] when the total or pending amount does
    pub fn check_amounts(&self) -> CoreResult<()> {
        let mut total = Money::zero();
        for line in &self.lines {
            let subtotal = line
                .checked_subtotal()
                .ok_or(CoreError::LineAmountOverflow {
                    product_id: line.product_id,
                })?;
            total = total
                .checked_add(subtotal)
                .ok_or(CoreError::TotalOverflow)?;
        }

        let paid = self.payment.map(|p| p.amount).unwrap_or_default();
        total.checked_sub(paid).ok_or(CoreError::TotalOverflow)?;
        Ok(())
    }

    /// Re-derives every computed field from lines and payment.
    ///
    /// Used after reading a persisted blob, which may predate a field or
    /// have been edited by hand. Duplicate product lines keep their first
    /// occurrence. Returns whether anything had to be corrected.
    pub fn normalize(&mut self) -> bool {
        let before = self.clone();

        let mut seen = std::collections::HashSet::new();
        self.lines.retain(|l| seen.insert(l.product_id));
        for line in &mut self.lines {
            line.recompute_subtotal();
        }
        if !self.kind.accepts_advance() {
            self.payment = None;
        }
        if !self.kind.uses_payment_method() {
            self.payment_method = PaymentMethodRef::default();
        }
        self.payment = self.payment.filter(|p| p.amount.is_positive());
        self.recompute_totals();

        *self != before
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i64, quantity: i64, price: i64) -> DraftLine {
        DraftLine::new(
            product_id,
            format!("SKU-{}", product_id),
            format!("Product {}", product_id),
            "unit",
            quantity,
            Money::from_minor(price),
        )
    }

    fn sum_of_lines(draft: &Draft) -> Money {
        draft
            .lines()
            .iter()
            .map(|l| l.unit_price.multiply_quantity(l.quantity))
            .sum()
    }

    #[test]
    fn test_worked_example() {
        let mut draft = Draft::empty(DocumentKind::Order);

        assert!(draft.add_line(line(1, 1, 10)));
        assert!(!draft.add_line(line(1, 5, 99)));
        assert_eq!(draft.item_count(), 1);

        assert!(draft.update_line(1, &LinePatch::new().quantity(3)));
        assert_eq!(draft.line(1).unwrap().subtotal, Money::from_minor(30));
        assert_eq!(draft.totals().total, Money::from_minor(30));

        assert!(draft.remove_line(1));
        assert!(draft.is_empty());
        assert_eq!(draft.totals().total, Money::zero());
    }

    #[test]
    fn test_duplicate_add_keeps_original_line() {
        let mut draft = Draft::empty(DocumentKind::Quotation);
        draft.add_line(line(4, 2, 500));
        draft.add_line(line(4, 9, 1));

        let kept = draft.line(4).unwrap();
        assert_eq!(kept.quantity, 2);
        assert_eq!(kept.unit_price, Money::from_minor(500));
    }

    #[test]
    fn test_add_line_normalizes_stale_subtotal() {
        let mut draft = Draft::empty(DocumentKind::Purchase);
        let mut stale = line(2, 4, 250);
        stale.subtotal = Money::from_minor(1);

        draft.add_line(stale);

        assert_eq!(draft.line(2).unwrap().subtotal, Money::from_minor(1000));
        assert_eq!(draft.totals().total, Money::from_minor(1000));
    }

    #[test]
    fn test_update_missing_product_is_noop() {
        let mut draft = Draft::empty(DocumentKind::Order);
        draft.add_line(line(1, 1, 100));
        let before = draft.clone();

        assert!(!draft.update_line(42, &LinePatch::new().quantity(7)));
        assert_eq!(draft, before);
    }

    #[test]
    fn test_update_price_recomputes_subtotal() {
        let mut draft = Draft::empty(DocumentKind::Order);
        draft.add_line(line(1, 2, 100));
        draft.add_line(line(2, 1, 300));

        draft.update_line(1, &LinePatch::new().unit_price(Money::from_minor(150)));

        assert_eq!(draft.line(1).unwrap().subtotal, Money::from_minor(300));
        assert_eq!(draft.totals().total, Money::from_minor(600));
    }

    #[test]
    fn test_update_name_only_leaves_amounts() {
        let mut draft = Draft::empty(DocumentKind::Quotation);
        draft.add_line(line(1, 2, 100));

        assert!(draft.update_line(1, &LinePatch::new().name("Cemento IP-30")));
        let updated = draft.line(1).unwrap();
        assert_eq!(updated.name, "Cemento IP-30");
        assert_eq!(updated.subtotal, Money::from_minor(200));
    }

    #[test]
    fn test_update_with_same_values_reports_no_change() {
        let mut draft = Draft::empty(DocumentKind::Order);
        draft.add_line(line(1, 2, 100));

        assert!(!draft.update_line(1, &LinePatch::new().quantity(2)));
        assert!(!draft.update_line(1, &LinePatch::new()));
    }

    #[test]
    fn test_blank_line_notes_clear() {
        let mut draft = Draft::empty(DocumentKind::Order);
        draft.add_line(line(1, 1, 100).with_notes("deliver monday"));
        assert_eq!(draft.line(1).unwrap().notes.as_deref(), Some("deliver monday"));

        draft.update_line(1, &LinePatch::new().notes("  "));
        assert!(draft.line(1).unwrap().notes.is_none());
    }

    #[test]
    fn test_totals_track_mixed_sequence() {
        let mut draft = Draft::empty(DocumentKind::Purchase);
        let steps: Vec<Box<dyn Fn(&mut Draft)>> = vec![
            Box::new(|d| {
                d.add_line(line(1, 3, 125));
            }),
            Box::new(|d| {
                d.add_line(line(2, 1, 4000));
            }),
            Box::new(|d| {
                d.update_line(1, &LinePatch::new().quantity(10));
            }),
            Box::new(|d| {
                d.add_line(line(3, 7, 33));
            }),
            Box::new(|d| {
                d.remove_line(2);
            }),
            Box::new(|d| {
                d.update_line(3, &LinePatch::new().unit_price(Money::zero()));
            }),
            Box::new(|d| {
                d.remove_line(99);
            }),
        ];

        for step in steps {
            step(&mut draft);
            assert_eq!(draft.totals().total, sum_of_lines(&draft));
            assert_eq!(
                draft.totals().pending,
                draft.totals().total - draft.totals().paid
            );
        }
        assert_eq!(draft.totals().total, Money::from_minor(1250));
    }

    #[test]
    fn test_payment_updates_pending() {
        let mut draft = Draft::empty(DocumentKind::Order);
        draft.add_line(line(1, 2, 5000));

        draft.set_payment(Money::from_minor(3000), 8).unwrap();
        assert_eq!(draft.totals().paid, Money::from_minor(3000));
        assert_eq!(draft.totals().pending, Money::from_minor(7000));
        assert_eq!(draft.payment().unwrap().actor_id, 8);

        draft.add_line(line(2, 1, 1000));
        assert_eq!(draft.totals().pending, Money::from_minor(8000));
    }

    #[test]
    fn test_zero_or_negative_payment_clears_record() {
        let mut draft = Draft::empty(DocumentKind::Order);
        draft.add_line(line(1, 1, 5000));
        draft.set_payment(Money::from_minor(1000), 1).unwrap();

        draft.set_payment(Money::zero(), 1).unwrap();
        assert!(draft.payment().is_none());
        assert_eq!(draft.totals().pending, Money::from_minor(5000));

        draft.set_payment(Money::from_minor(-200), 1).unwrap();
        assert!(draft.payment().is_none());
        assert_eq!(draft.totals().paid, Money::zero());
    }

    #[test]
    fn test_payment_rejected_outside_orders() {
        let mut quotation = Draft::empty(DocumentKind::Quotation);
        let err = quotation.set_payment(Money::from_minor(100), 1).unwrap_err();
        assert!(matches!(err, CoreError::NotSupported { .. }));

        let mut purchase = Draft::empty(DocumentKind::Purchase);
        assert!(purchase.set_payment(Money::from_minor(100), 1).is_err());
    }

    #[test]
    fn test_with_header_drops_payment_method_for_quotations() {
        let header = DraftHeader {
            counterparty: PartyRef::new(1, "Cliente"),
            warehouse: WarehouseRef::new(2, "ALM", "Central"),
            currency: "USD".to_string(),
            payment_method: Some(PaymentMethodRef::new(3, "EF", "Efectivo")),
        };

        let quotation = Draft::with_header(DocumentKind::Quotation, header.clone());
        assert_eq!(quotation.payment_method.id, 0);
        assert_eq!(quotation.currency, "USD");

        let order = Draft::with_header(DocumentKind::Order, header);
        assert_eq!(order.payment_method.id, 3);
        assert!(order.is_empty());
    }

    #[test]
    fn test_notes_blank_clears() {
        let mut draft = Draft::empty(DocumentKind::Order);
        draft.set_notes("entregar en obra");
        assert_eq!(draft.notes.as_deref(), Some("entregar en obra"));
        draft.set_notes("");
        assert!(draft.notes.is_none());
    }

    #[test]
    fn test_normalize_repairs_hand_edited_blob() {
        let json = r#"{
            "kind": "order",
            "lines": [
                { "productId": 1, "quantity": 2, "unitPrice": 100, "subtotal": 5 },
                { "productId": 1, "quantity": 9, "unitPrice": 100, "subtotal": 900 }
            ],
            "totals": { "total": 1 }
        }"#;
        let mut draft: Draft = serde_json::from_str(json).unwrap();

        assert!(draft.normalize());
        assert_eq!(draft.item_count(), 1);
        assert_eq!(draft.totals().total, Money::from_minor(200));
        assert_eq!(draft.currency, DEFAULT_CURRENCY);
        assert!(!draft.normalize());
    }

    #[test]
    fn test_add_line_refuses_overflowing_amounts() {
        let mut draft = Draft::empty(DocumentKind::Order);
        let huge = Money::from_minor(i64::MAX / 2 + 1);

        assert!(!draft.add_line(DraftLine::new(1, "X", "Grande", "u", 2, huge)));
        assert!(draft.is_empty());

        assert!(draft.add_line(DraftLine::new(2, "Y", "Mitad", "u", 1, huge)));
        assert!(!draft.add_line(DraftLine::new(3, "Z", "Otra", "u", 1, huge)));
        assert_eq!(draft.item_count(), 1);
        assert_eq!(draft.totals().total, huge);
    }

    #[test]
    fn test_update_refuses_overflow_and_keeps_line() {
        let mut draft = Draft::empty(DocumentKind::Order);
        draft.add_line(line(1, 2, 500));
        let before = draft.clone();

        let patch = LinePatch::new()
            .name("Renombrado")
            .quantity(2)
            .unit_price(Money::from_minor(i64::MAX / 2 + 1));
        assert!(!draft.update_line(1, &patch));

        assert_eq!(draft, before);
        let kept = draft.line(1).unwrap();
        assert_eq!(kept.subtotal, kept.computed_subtotal());
        assert_eq!(kept.name, "Product 1");
    }

    #[test]
    fn test_update_refuses_total_overflow() {
        let mut draft = Draft::empty(DocumentKind::Purchase);
        let half = Money::from_minor(i64::MAX / 2);
        draft.add_line(DraftLine::new(1, "A", "A", "u", 1, half));
        draft.add_line(line(2, 1, 100));

        assert!(!draft.update_line(2, &LinePatch::new().unit_price(half + half)));
        assert_eq!(draft.line(2).unwrap().unit_price, Money::from_minor(100));
        assert_eq!(draft.totals().total, sum_of_lines(&draft));
    }

    #[test]
    fn test_check_amounts_flags_corrupt_blob() {
        let json = r#"{
            "kind": "order",
            "lines": [{ "productId": 1, "quantity": 9223372036854775807, "unitPrice": 2 }]
        }"#;
        let draft: Draft = serde_json::from_str(json).unwrap();
        assert!(matches!(
            draft.check_amounts(),
            Err(CoreError::LineAmountOverflow { product_id: 1 })
        ));

        let json = r#"{
            "kind": "order",
            "lines": [
                { "productId": 1, "quantity": 1, "unitPrice": 9223372036854775807 },
                { "productId": 2, "quantity": 1, "unitPrice": 1 }
            ]
        }"#;
        let draft: Draft = serde_json::from_str(json).unwrap();
        assert!(matches!(draft.check_amounts(), Err(CoreError::TotalOverflow)));

        let mut fine = Draft::empty(DocumentKind::Order);
        fine.add_line(line(1, 3, 700));
        assert!(fine.check_amounts().is_ok());
    }

    #[test]
    fn test_old_purchase_blob_without_payment_method() {
        let json = r#"{
            "kind": "purchase",
            "status": "draft",
            "currency": "BOB",
            "counterparty": { "id": 4, "name": "Proveedor" },
            "warehouse": { "id": 1, "code": "ALM", "name": "Central" },
            "lines": [],
            "totals": { "total": 0 }
        }"#;
        let draft: Draft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.payment_method, PaymentMethodRef::default());
        assert_eq!(draft.totals(), DraftTotals::default());
    }
}
