//! Core text buffer implementation using a rope.
//!
//! The buffer owns the text, a single cursor with an optional selection
//! anchor, the modified flag, and the undo/redo history. Mutations set
//! the modified flag; [`TextBuffer::mark_saved`] clears it.

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

use crate::cursor::{Cursor, Position};
use crate::history::{Edit, History};
use crate::{BufferError, BufferResult};

/// A text buffer backed by a rope data structure.
///
/// `TextBuffer` is `Send` but accessed from one thread at a time; the
/// editor mutates it exclusively from its single control thread.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// The rope holding the text content
    rope: Rope,

    /// Cursor and selection state
    cursor: Cursor,

    /// Whether the buffer changed since it was created, loaded or saved
    modified: bool,

    /// Edit history for undo/redo
    history: History,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            cursor: Cursor::at_start(),
            modified: false,
            history: History::default(),
        }
    }

    // ==================== Text Access ====================

    /// Returns the entire text content.
    #[inline]
    pub fn text(&self) -> Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns a specific line (0-indexed), including the trailing
    /// newline if present.
    pub fn line(&self, line_idx: usize) -> BufferResult<Cow<'_, str>> {
        if line_idx >= self.len_lines() {
            return Err(BufferError::PositionOutOfBounds {
                line: line_idx,
                column: 0,
            });
        }
        Ok(self.rope.line(line_idx).into())
    }

    /// Returns a slice of text by character range.
    pub fn slice(&self, range: Range<usize>) -> BufferResult<Cow<'_, str>> {
        if range.end > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(range.end));
        }
        Ok(self.rope.slice(range).into())
    }

    // ==================== Measurements ====================

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Returns the number of characters in the buffer.
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of lines in the buffer.
    ///
    /// An empty buffer has 1 line; a buffer ending with `\n` counts the
    /// empty line after it.
    #[inline]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Returns the length of a line in characters, including the
    /// trailing newline if present.
    pub fn line_len(&self, line_idx: usize) -> BufferResult<usize> {
        if line_idx >= self.len_lines() {
            return Err(BufferError::PositionOutOfBounds {
                line: line_idx,
                column: 0,
            });
        }
        Ok(self.rope.line(line_idx).len_chars())
    }

    /// Returns the length of a line's content, excluding the trailing
    /// newline.
    pub fn line_content_len(&self, line_idx: usize) -> BufferResult<usize> {
        if line_idx >= self.len_lines() {
            return Err(BufferError::PositionOutOfBounds {
                line: line_idx,
                column: 0,
            });
        }
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        let mut chars = line.chars_at(len);
        while let Some(c) = chars.prev() {
            if c == '\n' || c == '\r' {
                len -= 1;
            } else {
                break;
            }
        }
        Ok(len)
    }

    // ==================== Mutations ====================

    /// Inserts text at a character index.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> BufferResult<()> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }
        if text.is_empty() {
            return Ok(());
        }

        self.history.push(Edit::insert(char_idx, text));
        self.rope.insert(char_idx, text);
        self.modified = true;
        self.cursor.clear_selection();
        self.clamp_cursor();
        Ok(())
    }

    /// Deletes text in a character range, returning the deleted text.
    pub fn delete(&mut self, range: Range<usize>) -> BufferResult<String> {
        if range.end > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(range.end));
        }

        let deleted: String = self.rope.slice(range.clone()).into();
        if deleted.is_empty() {
            return Ok(deleted);
        }

        self.history.push(Edit::delete(range.start, deleted.clone()));
        self.rope.remove(range);
        self.modified = true;
        self.cursor.clear_selection();
        self.clamp_cursor();
        Ok(deleted)
    }

    /// Replaces text in a range with new text, returning the old text.
    ///
    /// Recorded as one compound history entry, so a single undo restores
    /// the old text.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> BufferResult<String> {
        if range.end > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(range.end));
        }

        let old: String = self.rope.slice(range.clone()).into();
        if old.is_empty() && text.is_empty() {
            return Ok(old);
        }

        self.history.push(Edit::replace(range.start, old.clone(), text));
        self.rope.remove(range.clone());
        self.rope.insert(range.start, text);
        self.modified = true;
        self.cursor.clear_selection();
        self.clamp_cursor();
        Ok(old)
    }

    /// Replaces the entire content in one pass, as one history entry.
    ///
    /// The cursor moves to the start of the document and any selection
    /// is cleared.
    pub fn set_text(&mut self, text: &str) {
        let old: String = self.rope.slice(..).into();
        if old != text {
            self.history.push(Edit::replace(0, old, text));
        }
        self.rope = Rope::from_str(text);
        self.modified = true;
        self.cursor.move_to(Position::ZERO);
    }

    // ==================== Cursor & Selection ====================

    /// Returns the cursor state.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Returns the cursor position as a character index.
    pub fn cursor_char_idx(&self) -> usize {
        self.position_to_char_idx(self.cursor.position)
            .unwrap_or_else(|_| self.len_chars())
    }

    /// Moves the cursor to a position, clamped to the text, clearing any
    /// selection.
    pub fn move_cursor_to(&mut self, pos: Position) {
        self.cursor.move_to(pos);
        self.clamp_cursor();
    }

    /// Moves the cursor to a character index, clearing any selection.
    pub fn move_cursor_to_char(&mut self, char_idx: usize) {
        let idx = char_idx.min(self.len_chars());
        if let Ok(pos) = self.char_idx_to_position(idx) {
            self.cursor.move_to(pos);
        }
    }

    /// Selects a character range: the anchor lands at `range.start` and
    /// the cursor at `range.end`.
    pub fn select_chars(&mut self, range: Range<usize>) -> BufferResult<()> {
        if range.end > self.len_chars() || range.start > range.end {
            return Err(BufferError::InvalidCharIndex(range.end));
        }
        let start = self.char_idx_to_position(range.start)?;
        let end = self.char_idx_to_position(range.end)?;
        self.cursor.move_to(start);
        self.cursor.select_to(end);
        Ok(())
    }

    /// Selects the whole buffer.
    pub fn select_all(&mut self) {
        let len = self.len_chars();
        // Cannot fail: 0..len is always in bounds.
        let _ = self.select_chars(0..len);
    }

    /// Returns the selection as a character range, start <= end.
    pub fn selection_char_range(&self) -> Option<Range<usize>> {
        let (start, end) = self.cursor.selection_range()?;
        let start = self.position_to_char_idx(start).ok()?;
        let end = self.position_to_char_idx(end).ok()?;
        Some(start..end)
    }

    /// Returns the selected text, if any.
    pub fn selected_text(&self) -> Option<String> {
        let range = self.selection_char_range()?;
        self.slice(range).ok().map(Cow::into_owned)
    }

    /// Clears the selection, keeping the cursor position.
    pub fn clear_selection(&mut self) {
        self.cursor.clear_selection();
    }

    // ==================== Cursor Movement ====================

    /// Moves the cursor up by n lines, keeping the column clamped.
    pub fn move_up(&mut self, n: usize) {
        let pos = self.cursor.position;
        self.cursor
            .move_to(Position::new(pos.line.saturating_sub(n), pos.column));
        self.clamp_cursor();
    }

    /// Moves the cursor down by n lines, keeping the column clamped.
    pub fn move_down(&mut self, n: usize) {
        let pos = self.cursor.position;
        let max_line = self.len_lines().saturating_sub(1);
        self.cursor
            .move_to(Position::new((pos.line + n).min(max_line), pos.column));
        self.clamp_cursor();
    }

    /// Moves the cursor one character left, wrapping to the previous
    /// line end.
    pub fn move_left(&mut self) {
        let idx = self.cursor_char_idx();
        self.move_cursor_to_char(idx.saturating_sub(1));
    }

    /// Moves the cursor one character right, wrapping to the next line
    /// start.
    pub fn move_right(&mut self) {
        let idx = self.cursor_char_idx();
        self.move_cursor_to_char(idx + 1);
    }

    /// Moves the cursor to the start of the current line.
    pub fn move_to_line_start(&mut self) {
        let line = self.cursor.position.line;
        self.cursor.move_to(Position::new(line, 0));
    }

    /// Moves the cursor to the end of the current line's content.
    pub fn move_to_line_end(&mut self) {
        let line = self.cursor.position.line;
        if let Ok(len) = self.line_content_len(line) {
            self.cursor.move_to(Position::new(line, len));
        }
    }

    /// Clamps the cursor to the text bounds.
    fn clamp_cursor(&mut self) {
        let max_line = self.len_lines().saturating_sub(1);
        let mut pos = self.cursor.position;
        if pos.line > max_line {
            pos.line = max_line;
        }
        let content_len = self.line_content_len(pos.line).unwrap_or(0);
        if pos.column > content_len {
            pos.column = content_len;
        }
        self.cursor.position = pos;
    }

    // ==================== Cursor-relative Editing ====================

    /// Inserts text at the cursor, replacing the selection if one
    /// exists, and places the cursor after the inserted text.
    pub fn insert_at_cursor(&mut self, text: &str) -> BufferResult<()> {
        if let Some(range) = self.selection_char_range() {
            let start = range.start;
            self.delete(range)?;
            self.move_cursor_to_char(start);
        }
        let idx = self.cursor_char_idx();
        self.insert(idx, text)?;
        self.move_cursor_to_char(idx + text.chars().count());
        Ok(())
    }

    /// Deletes the selection, or the character before the cursor.
    pub fn delete_backward(&mut self) -> BufferResult<()> {
        if let Some(range) = self.selection_char_range() {
            let start = range.start;
            self.delete(range)?;
            self.move_cursor_to_char(start);
            return Ok(());
        }
        let idx = self.cursor_char_idx();
        if idx > 0 {
            self.delete(idx - 1..idx)?;
            self.move_cursor_to_char(idx - 1);
        }
        Ok(())
    }

    /// Deletes the selection, or the character after the cursor.
    pub fn delete_forward(&mut self) -> BufferResult<()> {
        if let Some(range) = self.selection_char_range() {
            let start = range.start;
            self.delete(range)?;
            self.move_cursor_to_char(start);
            return Ok(());
        }
        let idx = self.cursor_char_idx();
        if idx < self.len_chars() {
            self.delete(idx..idx + 1)?;
            self.move_cursor_to_char(idx);
        }
        Ok(())
    }

    // ==================== Search ====================

    /// Finds the next literal occurrence of `pattern`, searching forward
    /// from the cursor without wrapping.
    ///
    /// On a match the buffer selects it and places the cursor at its
    /// end; on a miss the cursor and selection are left unchanged.
    pub fn find_forward(&mut self, pattern: &str) -> Option<Range<usize>> {
        if pattern.is_empty() {
            return None;
        }
        let text: String = self.rope.slice(..).into();
        let from_char = self.cursor_char_idx();
        let from_byte = char_to_byte(&text, from_char);

        let rel = text[from_byte..].find(pattern)?;
        let start = from_char + text[from_byte..from_byte + rel].chars().count();
        let end = start + pattern.chars().count();

        // In bounds by construction.
        let _ = self.select_chars(start..end);
        Some(start..end)
    }

    /// Counts non-overlapping, left-to-right occurrences of `pattern`.
    pub fn occurrences(&self, pattern: &str) -> usize {
        if pattern.is_empty() {
            return 0;
        }
        let text: String = self.rope.slice(..).into();
        text.matches(pattern).count()
    }

    /// Replaces all non-overlapping occurrences of `pattern` in one
    /// pass, returning the count. Zero occurrences perform no mutation.
    pub fn replace_all(&mut self, pattern: &str, replacement: &str) -> usize {
        let count = self.occurrences(pattern);
        if count == 0 {
            return 0;
        }
        let text: String = self.rope.slice(..).into();
        self.set_text(&text.replace(pattern, replacement));
        count
    }

    // ==================== Undo/Redo ====================

    /// Undoes the last edit. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(edit) = self.history.undo() else {
            return false;
        };
        match edit {
            Edit::Insert { position, content } => {
                let end = position + content.chars().count();
                self.rope.remove(position..end);
                self.move_cursor_to_char(position);
            }
            Edit::Delete { position, content } => {
                self.rope.insert(position, &content);
                self.move_cursor_to_char(position + content.chars().count());
            }
            Edit::Replace { position, old, new } => {
                let end = position + new.chars().count();
                self.rope.remove(position..end);
                self.rope.insert(position, &old);
                self.move_cursor_to_char(position + old.chars().count());
            }
        }
        self.modified = true;
        true
    }

    /// Redoes the last undone edit. Returns false if there was nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        let Some(edit) = self.history.redo() else {
            return false;
        };
        match edit {
            Edit::Insert { position, content } => {
                self.rope.insert(position, &content);
                self.move_cursor_to_char(position + content.chars().count());
            }
            Edit::Delete { position, content } => {
                let end = position + content.chars().count();
                self.rope.remove(position..end);
                self.move_cursor_to_char(position);
            }
            Edit::Replace { position, old, new } => {
                let end = position + old.chars().count();
                self.rope.remove(position..end);
                self.rope.insert(position, &new);
                self.move_cursor_to_char(position + new.chars().count());
            }
        }
        self.modified = true;
        true
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ==================== State ====================

    /// Returns true if the buffer changed since it was created, loaded
    /// or saved.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clears the modified flag after a successful save or load.
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    // ==================== Position Conversion ====================

    /// Converts a (line, column) position to a character index.
    ///
    /// The column may sit one past the line content, the insertion
    /// point at the end of the line.
    pub fn position_to_char_idx(&self, pos: Position) -> BufferResult<usize> {
        if pos.line >= self.len_lines() {
            return Err(BufferError::PositionOutOfBounds {
                line: pos.line,
                column: pos.column,
            });
        }
        let line_len = self.rope.line(pos.line).len_chars();
        if pos.column > line_len {
            return Err(BufferError::PositionOutOfBounds {
                line: pos.line,
                column: pos.column,
            });
        }
        Ok(self.rope.line_to_char(pos.line) + pos.column)
    }

    /// Converts a character index to a (line, column) position.
    pub fn char_idx_to_position(&self, char_idx: usize) -> BufferResult<Position> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }
        let line = self.rope.char_to_line(char_idx);
        let column = char_idx - self.rope.line_to_char(line);
        Ok(Position { line, column })
    }
}

/// Maps a character index into `text` to a byte index, saturating at the
/// end of the text.
fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
            cursor: Cursor::at_start(),
            modified: false,
            history: History::default(),
        }
    }
}

impl From<String> for TextBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}
