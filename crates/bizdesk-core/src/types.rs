//! # Domain Types
//!
//! Document kinds and the header references a draft points at.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Header References                               │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    PartyRef     │   │  WarehouseRef   │   │PaymentMethodRef │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (0 = unset) │   │  id (0 = unset) │   │  id (0 = unset) │       │
//! │  │  name           │   │  code           │   │  code           │       │
//! │  │  address        │   │  name           │   │  name           │       │
//! │  │  tax_id, phone  │   │  address        │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │    customer (orders,                                                    │
//! │    quotations) or                                                       │
//! │    supplier (purchases)                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Unset References
//! Backend ids start at 1, so an id of `0` means "nothing selected yet".
//! This is also how the persisted JSON encodes an empty header, and it is
//! what the submission checks look at.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Document Kind
// =============================================================================

/// The three document flows that keep a client-side draft.
///
/// ## Per-Kind Behavior
/// ```text
/// ┌────────────┬──────────────┬────────────────┬─────────┬──────────────────┐
/// │ Kind       │ Counterparty │ Payment method │ Advance │ Storage key      │
/// ├────────────┼──────────────┼────────────────┼─────────┼──────────────────┤
/// │ Order      │ customer     │ yes            │ yes     │ order_preview    │
/// │ Quotation  │ customer     │ no             │ no      │ quotation_preview│
/// │ Purchase   │ supplier     │ yes            │ no      │ purchase_preview │
/// └────────────┴──────────────┴────────────────┴─────────┴──────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Order,
    Quotation,
    Purchase,
}

impl DocumentKind {
    /// All kinds, in display order.
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Order,
        DocumentKind::Quotation,
        DocumentKind::Purchase,
    ];

    /// Lowercase name, as used in storage keys and logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Order => "order",
            DocumentKind::Quotation => "quotation",
            DocumentKind::Purchase => "purchase",
        }
    }

    /// Storage key of the live draft.
    pub const fn draft_key(&self) -> &'static str {
        match self {
            DocumentKind::Order => "order_preview",
            DocumentKind::Quotation => "quotation_preview",
            DocumentKind::Purchase => "purchase_preview",
        }
    }

    /// Storage key of the last successfully submitted document.
    pub const fn submission_key(&self) -> &'static str {
        match self {
            DocumentKind::Order => "order_current",
            DocumentKind::Quotation => "quotation_current",
            DocumentKind::Purchase => "purchase_current",
        }
    }

    /// Which side of the business the counterparty is on.
    pub const fn counterparty_role(&self) -> PartyRole {
        match self {
            DocumentKind::Order | DocumentKind::Quotation => PartyRole::Customer,
            DocumentKind::Purchase => PartyRole::Supplier,
        }
    }

    /// Whether drafts of this kind carry a payment method.
    pub const fn uses_payment_method(&self) -> bool {
        matches!(self, DocumentKind::Order | DocumentKind::Purchase)
    }

    /// Whether drafts of this kind can record an advance payment.
    pub const fn accepts_advance(&self) -> bool {
        matches!(self, DocumentKind::Order)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "order" | "orders" => Ok(DocumentKind::Order),
            "quotation" | "quotations" | "quote" => Ok(DocumentKind::Quotation),
            "purchase" | "purchases" => Ok(DocumentKind::Purchase),
            other => Err(CoreError::UnknownDocumentKind(other.to_string())),
        }
    }
}

/// Role of the counterparty on a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Customer,
    Supplier,
}

// =============================================================================
// Draft Status
// =============================================================================

/// Status of a client-side draft.
///
/// A draft is never anything but "not yet submitted": once the backend
/// accepts it, the caller clears the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    #[default]
    Draft,
}

// =============================================================================
// Header References
// =============================================================================

/// Common behavior of header references.
pub trait HeaderRef {
    /// Backend id, `0` when unset.
    fn id(&self) -> i64;

    /// Whether a real entity has been selected.
    fn is_set(&self) -> bool {
        self.id() != 0
    }
}

/// A customer or supplier attached to a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct PartyRef {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// NIT / tax identification number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl PartyRef {
    /// Creates a reference with only the mandatory display fields.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        PartyRef {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_tax_id(mut self, tax_id: impl Into<String>) -> Self {
        self.tax_id = Some(tax_id.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

impl HeaderRef for PartyRef {
    fn id(&self) -> i64 {
        self.id
    }
}

/// The warehouse goods leave from (orders) or arrive at (purchases).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct WarehouseRef {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl WarehouseRef {
    pub fn new(id: i64, code: impl Into<String>, name: impl Into<String>) -> Self {
        WarehouseRef {
            id,
            code: code.into(),
            name: name.into(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

impl HeaderRef for WarehouseRef {
    fn id(&self) -> i64 {
        self.id
    }
}

/// How the document will be paid (cash, transfer, credit, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentMethodRef {
    pub id: i64,
    pub code: String,
    pub name: String,
}

impl PaymentMethodRef {
    pub fn new(id: i64, code: impl Into<String>, name: impl Into<String>) -> Self {
        PaymentMethodRef {
            id,
            code: code.into(),
            name: name.into(),
        }
    }
}

impl HeaderRef for PaymentMethodRef {
    fn id(&self) -> i64 {
        self.id
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_keys() {
        assert_eq!(DocumentKind::Order.draft_key(), "order_preview");
        assert_eq!(DocumentKind::Quotation.submission_key(), "quotation_current");
        assert_eq!(DocumentKind::Purchase.draft_key(), "purchase_preview");
    }

    #[test]
    fn test_kind_capabilities() {
        assert!(DocumentKind::Order.accepts_advance());
        assert!(!DocumentKind::Purchase.accepts_advance());
        assert!(!DocumentKind::Quotation.uses_payment_method());
        assert_eq!(
            DocumentKind::Purchase.counterparty_role(),
            PartyRole::Supplier
        );
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Order".parse::<DocumentKind>().unwrap(), DocumentKind::Order);
        assert_eq!("quote".parse::<DocumentKind>().unwrap(), DocumentKind::Quotation);
        assert!("invoice".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn test_unset_reference() {
        assert!(!PartyRef::default().is_set());
        assert!(WarehouseRef::new(3, "ALM-1", "Central").is_set());
    }

    #[test]
    fn test_party_ref_json_shape() {
        let party = PartyRef::new(7, "Ferretería Andina").with_tax_id("1029384756");
        let json = serde_json::to_value(&party).unwrap();
        assert_eq!(json["taxId"], "1029384756");
        assert!(json.get("phone").is_none());

        let back: PartyRef = serde_json::from_str(r#"{"id":7}"#).unwrap();
        assert_eq!(back.id, 7);
        assert!(back.name.is_empty());
    }
}
