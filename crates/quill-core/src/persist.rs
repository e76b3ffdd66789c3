//! Persistence seams: the interaction trait the save/close flows prompt
//! through, their outcome types, and the file write itself.
//!
//! Frontends implement [`Interaction`] with real dialogs; tests and
//! collect-then-act frontends use [`Replies`] with predetermined
//! answers. Either way the core flow is the same code path.

use std::io;
use std::path::{Path, PathBuf};

use crate::session::Session;

/// Answer to a close prompt on a modified session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseChoice {
    /// Save the session, then close it
    Save,
    /// Close without saving
    Discard,
    /// Keep the session open
    Cancel,
}

/// Result of a save flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The session was written and rebound.
    Saved,
    /// The user dismissed the path prompt; nothing changed.
    Cancelled,
}

/// Result of a close flow (single session or the whole window).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The session(s) closed.
    Closed,
    /// The user cancelled; the remaining sessions stay open.
    Cancelled,
}

/// User-interaction seam for the persistence flows.
///
/// Calls are synchronous: the editor blocks on the answer, the terminal
/// analogue of a modal dialog.
pub trait Interaction {
    /// Asks for a destination path when the session is unbound or the
    /// user requested save-as. `None` means the prompt was dismissed.
    fn request_save_path(&mut self, session: &Session) -> Option<PathBuf>;

    /// Asks what to do with a modified session that is about to close.
    fn confirm_close(&mut self, session: &Session) -> CloseChoice;
}

/// An [`Interaction`] with predetermined replies.
///
/// Frontends that run their own modal prompts collect the answers first
/// and hand them to the core through this type, so the flow logic stays
/// in one place.
#[derive(Debug, Clone, Default)]
pub struct Replies {
    /// Reply for a save-path prompt, consumed on first use
    pub save_path: Option<PathBuf>,
    /// Reply for a close prompt
    pub close_choice: Option<CloseChoice>,
}

impl Replies {
    /// Replies that answer a save-path prompt with `path`.
    pub fn save_to(path: PathBuf) -> Self {
        Self {
            save_path: Some(path),
            close_choice: None,
        }
    }

    /// Replies that answer a close prompt with `choice`.
    pub fn close_with(choice: CloseChoice) -> Self {
        Self {
            save_path: None,
            close_choice: Some(choice),
        }
    }

    /// Sets the save-path reply as well.
    pub fn and_save_to(mut self, path: PathBuf) -> Self {
        self.save_path = Some(path);
        self
    }
}

impl Interaction for Replies {
    fn request_save_path(&mut self, _session: &Session) -> Option<PathBuf> {
        self.save_path.take()
    }

    fn confirm_close(&mut self, _session: &Session) -> CloseChoice {
        self.close_choice.unwrap_or(CloseChoice::Cancel)
    }
}

/// Writes the full text to `path` atomically: a temporary sibling file
/// is written first and renamed into place.
pub fn write_text(path: &Path, text: &str) -> io::Result<()> {
    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, text.as_bytes())?;
    std::fs::rename(&temp_path, path)?;
    Ok(())
}
