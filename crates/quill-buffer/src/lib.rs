//! # Quill Buffer
//!
//! The text surface of the editor: a rope-backed buffer that owns the
//! text content, a single cursor with an optional selection anchor, a
//! modified flag, and an undo/redo history.
//!
//! Everything above this crate (sessions, tabs, persistence) treats the
//! buffer as a capability: get/set text, move the cursor, search forward
//! from the cursor, observe the modified flag.

mod buffer;
mod cursor;
mod history;

pub use buffer::TextBuffer;
pub use cursor::{Cursor, Position};
pub use history::{Edit, History};

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Position {line}:{column} is out of bounds")]
    PositionOutOfBounds { line: usize, column: usize },

    #[error("Invalid character index: {0}")]
    InvalidCharIndex(usize),
}
