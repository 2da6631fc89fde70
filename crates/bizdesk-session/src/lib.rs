//! # bizdesk-session: Session Layer for BizDesk
//!
//! Connects the views to the draft stores: loads configuration, sets up
//! logging, holds one thread-safe draft per document kind and exposes the
//! command functions.
//!
//! ## Module Organization
//! ```text
//! bizdesk_session/
//! ├── lib.rs            ◄─── You are here (startup & tracing)
//! ├── config.rs         ◄─── SessionConfig: defaults → TOML → env
//! ├── state/
//! │   ├── mod.rs        ◄─── State type exports
//! │   ├── draft.rs      ◄─── DraftState: Arc<Mutex<DraftStore>>
//! │   └── session.rs    ◄─── SessionState: blobs + per-kind state
//! ├── commands/
//! │   ├── mod.rs        ◄─── DraftResponse
//! │   ├── draft.rs      ◄─── Header, line, notes and payment commands
//! │   └── submission.rs ◄─── Request projection, last submission
//! └── error.rs          ◄─── ApiError with machine-readable codes
//! ```
//!
//! ## Startup
//! ```rust,no_run
//! use bizdesk_core::DocumentKind;
//! use bizdesk_session::{commands, init_tracing, SessionConfig, SessionState};
//!
//! let config = SessionConfig::load_or_default(None);
//! init_tracing(&config);
//!
//! let session = SessionState::open(config)?;
//! let draft = commands::draft::get_draft(&session, DocumentKind::Order);
//! println!("{} lines, {}", draft.item_count, draft.display.total);
//! # Ok::<(), bizdesk_session::ConfigError>(())
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

pub use commands::{DraftResponse, TotalsDisplay};
pub use config::{ConfigError, ConfigResult, SessionConfig, StorageBackend};
pub use error::{ApiError, ErrorCode};
pub use state::{DraftState, SessionState};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bizdesk_store=trace` - Trace the store only
/// - Default: `config.logging.filter`
///
/// Calling it again (e.g. from several tests) keeps the first subscriber.
pub fn init_tracing(config: &SessionConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
    {
        info!(filter = %config.logging.filter, "Tracing initialized");
    }
}
