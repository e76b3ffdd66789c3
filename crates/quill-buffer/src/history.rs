//! Undo/redo history.
//!
//! Each mutation of the buffer is recorded as an [`Edit`]. Undo pops the
//! undo stack and pushes onto the redo stack; a fresh edit clears the
//! redo stack. A replace is one compound entry, so a single undo
//! reverses both halves of it.

use serde::{Deserialize, Serialize};

/// A single recorded edit, in character-index coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Edit {
    /// Text was inserted
    Insert { position: usize, content: String },
    /// Text was deleted
    Delete { position: usize, content: String },
    /// Text was swapped for other text in place, undone as a unit
    Replace {
        position: usize,
        old: String,
        new: String,
    },
}

impl Edit {
    /// Creates an insert edit.
    pub fn insert(position: usize, content: impl Into<String>) -> Self {
        Self::Insert {
            position,
            content: content.into(),
        }
    }

    /// Creates a delete edit.
    pub fn delete(position: usize, content: impl Into<String>) -> Self {
        Self::Delete {
            position,
            content: content.into(),
        }
    }

    /// Creates a compound replace edit.
    pub fn replace(position: usize, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self::Replace {
            position,
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Bounded stack pair holding undo and redo state.
#[derive(Debug, Clone)]
pub struct History {
    undo: Vec<Edit>,
    redo: Vec<Edit>,
    max_entries: usize,
}

impl History {
    /// Creates a history keeping at most `max_entries` undo steps.
    pub fn new(max_entries: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_entries,
        }
    }

    /// Records a fresh edit. Clears the redo stack.
    pub fn push(&mut self, edit: Edit) {
        self.redo.clear();
        if self.undo.len() == self.max_entries {
            self.undo.remove(0);
        }
        self.undo.push(edit);
    }

    /// Pops the most recent edit for undoing. The caller applies the
    /// inverse operation.
    pub fn undo(&mut self) -> Option<Edit> {
        let edit = self.undo.pop()?;
        self.redo.push(edit.clone());
        Some(edit)
    }

    /// Pops the most recently undone edit for re-applying.
    pub fn redo(&mut self) -> Option<Edit> {
        let edit = self.redo.pop()?;
        self.undo.push(edit.clone());
        Some(edit)
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(1000)
    }
}
