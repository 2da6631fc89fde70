//! # Commands Module
//!
//! Functions the views call. Each takes the [`SessionState`] plus the
//! arguments of one user action and returns a serialisable result.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (DraftResponse, exports)
//! ├── draft.rs       ◄─── Header, line, notes and payment editing
//! └── submission.rs  ◄─── Request projection and last-submission replay
//! ```
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  View                                                                   │
//! │  ────                                                                   │
//! │  const draft = await addLine('order', { productId: 12, quantity: 2 })   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  add_line(&session, DocumentKind::Order, line)                          │
//! │         │  1. validate input the store does not check                  │
//! │         │  2. lock the kind's DraftState                               │
//! │         │  3. DraftStore::add_line (write-through)                     │
//! │         ▼                                                               │
//! │  Result<DraftResponse, ApiError> ──► JSON to the view                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`SessionState`]: crate::state::SessionState

pub mod draft;
pub mod submission;

use serde::Serialize;
use ts_rs::TS;

use bizdesk_core::{Draft, DraftTotals};
use bizdesk_store::DraftStore;

use crate::config::SessionConfig;

/// The draft plus the summary figures the views display next to it.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub draft: Draft,
    pub item_count: usize,
    pub total_quantity: i64,
    pub totals: DraftTotals,
    pub display: TotalsDisplay,
}

/// Totals already formatted with the configured currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TotalsDisplay {
    pub total: String,
    pub paid: String,
    pub pending: String,
}

impl DraftResponse {
    pub fn from_store(store: &DraftStore, config: &SessionConfig) -> Self {
        let totals = store.totals();
        DraftResponse {
            draft: Draft::clone(&store.snapshot()),
            item_count: store.item_count(),
            total_quantity: store.total_quantity(),
            totals,
            display: TotalsDisplay {
                total: config.format_amount(totals.total),
                paid: config.format_amount(totals.paid),
                pending: config.format_amount(totals.pending),
            },
        }
    }
}
