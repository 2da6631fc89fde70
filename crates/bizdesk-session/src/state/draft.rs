//! # Draft State
//!
//! Thread-safe handle to the [`DraftStore`] of one document kind.
//!
//! ## Thread Safety
//! The store is wrapped in `Arc<Mutex<T>>`: commands for the same kind may
//! arrive from several views at once, and each store operation must run to
//! completion before the next one starts.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  View Action              Command                 Store Change          │
//! │  ───────────              ───────                 ────────────          │
//! │                                                                         │
//! │  Pick product ──────────► add_line() ───────────► lines.push(line)     │
//! │  Edit quantity ─────────► update_line() ────────► line.quantity = n    │
//! │  Click remove ──────────► remove_line() ────────► lines.retain(..)     │
//! │  Cancel ────────────────► clear_draft() ────────► empty + blob removed │
//! │  Show cart ─────────────► get_draft() ──────────► (read only)          │
//! │                                                                         │
//! │  NOTE: reads take the lock too, but only long enough to snapshot.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bizdesk_core::DocumentKind;
use bizdesk_store::DraftStore;

/// Shared, lockable draft store.
#[derive(Debug, Clone)]
pub struct DraftState {
    kind: DocumentKind,
    store: Arc<Mutex<DraftStore>>,
}

impl DraftState {
    pub fn new(store: DraftStore) -> Self {
        DraftState {
            kind: store.kind(),
            store: Arc::new(Mutex::new(store)),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Executes a function with read access to the store.
    ///
    /// ```rust,ignore
    /// let totals = state.with_store(|store| store.totals());
    /// ```
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&DraftStore) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the store.
    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut DraftStore) -> R,
    {
        f(&mut self.lock())
    }

    // Draft edits compute every new amount before writing any field, and
    // money arithmetic never panics, so a poisoned lock still guards a
    // consistent draft.
    fn lock(&self) -> MutexGuard<'_, DraftStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdesk_core::{DraftLine, LinePatch, Money};
    use bizdesk_store::MemoryBlobStore;
    use std::thread;

    #[test]
    fn test_clones_share_one_store() {
        let state = DraftState::new(DraftStore::open(
            DocumentKind::Order,
            Arc::new(MemoryBlobStore::new()),
        ));

        let handles: Vec<_> = (1..=8)
            .map(|id| {
                let state = state.clone();
                thread::spawn(move || {
                    state.with_store_mut(|s| {
                        s.add_line(DraftLine::new(
                            id,
                            format!("SKU-{}", id),
                            "Producto",
                            "unidad",
                            1,
                            Money::from_minor(100),
                        ))
                    })
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }

        assert_eq!(state.kind(), DocumentKind::Order);
        assert_eq!(state.with_store(|s| s.item_count()), 8);
        assert_eq!(
            state.with_store(|s| s.totals().total),
            Money::from_minor(800)
        );
    }

    #[test]
    fn test_state_stays_usable_after_a_holder_panics() {
        let state = DraftState::new(DraftStore::open(
            DocumentKind::Order,
            Arc::new(MemoryBlobStore::new()),
        ));
        state.with_store_mut(|s| {
            s.add_line(DraftLine::new(1, "SKU-1", "Producto", "unidad", 2, Money::from_minor(500)))
        });

        let holder = state.clone();
        let outcome = thread::spawn(move || {
            holder.with_store_mut(|s| {
                s.update_line(
                    1,
                    &LinePatch::new().unit_price(Money::from_minor(i64::MAX / 2 + 1)),
                );
                panic!("view crashed while holding the draft");
            })
        })
        .join();
        assert!(outcome.is_err());

        let line = state.with_store(|s| s.lines()[0].clone());
        assert_eq!(line.unit_price, Money::from_minor(500));
        assert_eq!(line.subtotal, line.computed_subtotal());
        assert_eq!(state.with_store(|s| s.totals().total), Money::from_minor(1000));
    }
}
