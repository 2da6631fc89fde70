//! # State Module
//!
//! Session state shared by the command functions.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      SessionState                               │   │
//! │  │  config: SessionConfig (read-only after startup)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  DraftState  │  │  DraftState  │  │   DraftState     │              │
//! │  │   (order)    │  │ (quotation)  │  │   (purchase)     │              │
//! │  │  Arc<Mutex<  │  │  Arc<Mutex<  │  │  Arc<Mutex<      │              │
//! │  │  DraftStore>>│  │  DraftStore>>│  │  DraftStore>>    │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  Kinds never block each other: each has its own lock.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod draft;
mod session;

pub use draft::DraftState;
pub use session::SessionState;
