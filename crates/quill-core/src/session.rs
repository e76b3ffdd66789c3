//! Document sessions.
//!
//! A session pairs one text surface with its metadata: the backing file
//! path (or none for an untitled document) and the display name derived
//! from it. The modified flag lives on the surface itself and toggles on
//! every content change.

use quill_buffer::TextBuffer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::CoreResult;

/// Unique identifier for a session, stable for the session's lifetime.
///
/// Tab order is positional; the id is what events refer to, since
/// indices shift as tabs close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new unique session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One open document: text surface plus file binding.
///
/// Invariants:
/// - the modified flag is false immediately after a successful load or
///   save, and true after any text mutation until then;
/// - the display name is a pure function of the bound path.
#[derive(Debug)]
pub struct Session {
    /// Unique identifier
    id: SessionId,

    /// The text surface holding content, cursor and modified flag
    surface: TextBuffer,

    /// Bound file path (None for untitled documents)
    path: Option<PathBuf>,

    /// Display name, derived from the path
    name: String,
}

impl Session {
    /// Creates a new untitled, empty session.
    pub fn untitled() -> Self {
        Self {
            id: SessionId::new(),
            surface: TextBuffer::new(),
            path: None,
            name: display_name_of(None),
        }
    }

    /// Loads a session from a file. Starts unmodified.
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Ok(Self {
            id: SessionId::new(),
            surface: TextBuffer::from(content),
            path: Some(path.to_path_buf()),
            name: display_name_of(Some(path)),
        })
    }

    /// Binds the session to a new path after a successful save,
    /// recomputing the display name and clearing the modified flag.
    pub fn rebind(&mut self, path: PathBuf) {
        self.name = display_name_of(Some(&path));
        self.path = Some(path);
        self.surface.mark_saved();
    }

    /// Returns the session ID.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the bound file path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the session has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.surface.is_modified()
    }

    /// Returns the text surface.
    pub fn surface(&self) -> &TextBuffer {
        &self.surface
    }

    /// Returns a mutable reference to the text surface.
    pub fn surface_mut(&mut self) -> &mut TextBuffer {
        &mut self.surface
    }
}

/// The display name for a binding: the file name when bound, "Untitled"
/// otherwise.
fn display_name_of(path: Option<&Path>) -> String {
    path.and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("Untitled")
        .to_string()
}
