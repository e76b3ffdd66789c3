//! # Quill Core
//!
//! Editor logic independent of any frontend: document sessions, the tab
//! collection, the find/replace engine, and the persistence controller.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                       Editor                         │
//! │  ┌────────────┐ ┌───────────────┐ ┌───────────────┐  │
//! │  │   Config   │ │   EventBus    │ │  Find/Replace │  │
//! │  └────────────┘ └───────────────┘ └───────────────┘  │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │              SessionCollection                 │  │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐        │  │
//! │  │   │ Session │  │ Session │  │ Session │  ...   │  │
//! │  │   └─────────┘  └─────────┘  └─────────┘        │  │
//! │  └────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! User interaction (save-path prompts, close confirmation) sits behind
//! the [`Interaction`] trait so frontends and tests drive the same flows.

pub mod collection;
pub mod config;
pub mod editor;
pub mod event;
pub mod persist;
pub mod search;
pub mod session;
pub mod startup;

pub use collection::SessionCollection;
pub use config::{EditorConfig, FileFilter};
pub use editor::Editor;
pub use event::{EventBus, EventStream, SessionEvent};
pub use persist::{CloseChoice, CloseOutcome, Interaction, Replies, SaveOutcome};
pub use search::{FindOutcome, ReplaceOutcome};
pub use session::{Session, SessionId};
pub use startup::{OpenRequestSender, OpenRequests};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations.
///
/// Search misses and user cancellations are not errors; they are
/// reported as outcome values ([`FindOutcome`], [`SaveOutcome`],
/// [`CloseOutcome`]).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("no active session")]
    NoActiveSession,

    #[error("tab index {0} out of range")]
    OutOfRange(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
