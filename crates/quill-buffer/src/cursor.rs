//! Cursor and position types for text navigation.

use serde::{Deserialize, Serialize};

/// A position in the text buffer (line and column).
///
/// Both line and column are 0-indexed; columns count characters, not
/// bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters)
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position at the start of the document.
    pub const ZERO: Position = Position { line: 0, column: 0 };
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.column.cmp(&other.column))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 1-indexed for user-facing output
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A cursor with a position and an optional selection anchor.
///
/// When `anchor` is set, the text between the anchor and the position is
/// selected, in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Current cursor position
    pub position: Position,

    /// Selection anchor, if text is selected
    pub anchor: Option<Position>,
}

impl Cursor {
    /// Creates a cursor at a position with no selection.
    pub fn new(position: Position) -> Self {
        Self {
            position,
            anchor: None,
        }
    }

    /// Creates a cursor at line 0, column 0.
    pub fn at_start() -> Self {
        Self::new(Position::ZERO)
    }

    /// Moves the cursor, clearing any selection.
    pub fn move_to(&mut self, position: Position) {
        self.position = position;
        self.anchor = None;
    }

    /// Moves the cursor, extending the selection from the current
    /// position.
    pub fn select_to(&mut self, position: Position) {
        if self.anchor.is_none() {
            self.anchor = Some(self.position);
        }
        self.position = position;
    }

    /// Clears the selection, keeping the cursor position.
    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// Returns true if text is selected.
    pub fn has_selection(&self) -> bool {
        self.anchor.is_some() && self.anchor != Some(self.position)
    }

    /// Returns the selection as (start, end) with start <= end,
    /// regardless of selection direction.
    pub fn selection_range(&self) -> Option<(Position, Position)> {
        if !self.has_selection() {
            return None;
        }
        self.anchor.map(|anchor| {
            if anchor < self.position {
                (anchor, self.position)
            } else {
                (self.position, anchor)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_ordering() {
        let p1 = Position::new(1, 5);
        let p2 = Position::new(2, 3);
        let p3 = Position::new(1, 10);

        assert!(p1 < p2);
        assert!(p1 < p3);
        assert!(p3 < p2);
    }

    #[test]
    fn cursor_selection_is_normalized() {
        let mut cursor = Cursor::new(Position::new(2, 3));
        assert!(!cursor.has_selection());

        // Select backwards: range still comes out start-before-end.
        cursor.select_to(Position::new(1, 5));
        assert!(cursor.has_selection());

        let (start, end) = cursor.selection_range().unwrap();
        assert_eq!(start, Position::new(1, 5));
        assert_eq!(end, Position::new(2, 3));
    }

    #[test]
    fn empty_selection_is_no_selection() {
        let mut cursor = Cursor::new(Position::new(0, 4));
        cursor.select_to(Position::new(0, 4));
        assert!(!cursor.has_selection());
        assert!(cursor.selection_range().is_none());
    }
}
