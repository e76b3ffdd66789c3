//! Find/replace over a text surface.
//!
//! Matching is literal (no regex), case-sensitive, forward from the
//! cursor, and never wraps. Misses and empty queries are outcomes, not
//! errors; the caller surfaces them as informational messages.

use quill_buffer::TextBuffer;

/// Result of a find or replace-current operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindOutcome {
    /// A match was found; it is now selected with the cursor at its end.
    Found,
    /// No match between the cursor and the end of the text. The cursor
    /// and selection are unchanged.
    NotFound,
    /// The query was empty; nothing happened.
    EmptyQuery,
    /// There is no active session to search.
    NoSession,
}

/// Result of a replace-all operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// All occurrences were replaced; carries the substitution count.
    Replaced(usize),
    /// The query does not occur in the text; nothing was mutated.
    NoOccurrences,
    /// The query was empty; nothing happened.
    EmptyQuery,
    /// There is no active session to search.
    NoSession,
}

/// Searches forward from the cursor for the next literal occurrence of
/// `query`. On a match the surface selects it and places the cursor at
/// its end, so repeated calls step through the text.
pub fn find_next(surface: &mut TextBuffer, query: &str) -> FindOutcome {
    if query.is_empty() {
        return FindOutcome::EmptyQuery;
    }
    match surface.find_forward(query) {
        Some(_) => FindOutcome::Found,
        None => FindOutcome::NotFound,
    }
}

/// Replaces the current selection when it equals `query` exactly, then
/// always advances to the next occurrence.
///
/// The advance happens whether or not a replacement occurred, and
/// whether or not find was ever called before: "Replace" always leaves
/// the cursor at the next match, mirroring the find → replace → find
/// workflow.
pub fn replace_current(surface: &mut TextBuffer, query: &str, replacement: &str) -> FindOutcome {
    if query.is_empty() {
        return FindOutcome::EmptyQuery;
    }

    if surface.selected_text().as_deref() == Some(query) {
        if let Some(range) = surface.selection_char_range() {
            let start = range.start;
            // In bounds: the range came from the current selection.
            let _ = surface.replace(range, replacement);
            surface.move_cursor_to_char(start + replacement.chars().count());
        }
    }

    find_next(surface, query)
}

/// Replaces every non-overlapping occurrence of `query` left to right
/// in one pass. Zero occurrences mutate nothing.
pub fn replace_all(surface: &mut TextBuffer, query: &str, replacement: &str) -> ReplaceOutcome {
    if query.is_empty() {
        return ReplaceOutcome::EmptyQuery;
    }
    match surface.replace_all(query, replacement) {
        0 => ReplaceOutcome::NoOccurrences,
        count => ReplaceOutcome::Replaced(count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_next_steps_through_matches() {
        let mut surface = TextBuffer::from("foo bar foo");

        assert_eq!(find_next(&mut surface, "foo"), FindOutcome::Found);
        assert_eq!(surface.selection_char_range(), Some(0..3));

        assert_eq!(find_next(&mut surface, "foo"), FindOutcome::Found);
        assert_eq!(surface.selection_char_range(), Some(8..11));

        // No wrap: at the end of the text the search reports a miss.
        assert_eq!(find_next(&mut surface, "foo"), FindOutcome::NotFound);
        assert_eq!(surface.selection_char_range(), Some(8..11));
    }

    #[test]
    fn find_next_empty_query() {
        let mut surface = TextBuffer::from("foo");
        assert_eq!(find_next(&mut surface, ""), FindOutcome::EmptyQuery);
    }

    #[test]
    fn replace_current_replaces_matching_selection() {
        let mut surface = TextBuffer::from("foo bar foo");
        find_next(&mut surface, "foo");

        let outcome = replace_current(&mut surface, "foo", "qux");
        assert_eq!(surface.text(), "qux bar foo");
        // The cursor advanced to the next occurrence.
        assert_eq!(outcome, FindOutcome::Found);
        assert_eq!(surface.selection_char_range(), Some(8..11));
    }

    #[test]
    fn replace_current_skips_mismatched_selection_but_still_advances() {
        let mut surface = TextBuffer::from("foo bar foo");
        surface.select_chars(4..7).unwrap(); // "bar"

        let outcome = replace_current(&mut surface, "foo", "qux");
        // No replacement, but find still ran from the selection end.
        assert_eq!(surface.text(), "foo bar foo");
        assert_eq!(outcome, FindOutcome::Found);
        assert_eq!(surface.selection_char_range(), Some(8..11));
    }

    #[test]
    fn replace_current_before_any_find_advances() {
        let mut surface = TextBuffer::from("foo bar foo");

        let outcome = replace_current(&mut surface, "foo", "qux");
        assert_eq!(surface.text(), "foo bar foo");
        assert_eq!(outcome, FindOutcome::Found);
        assert_eq!(surface.selection_char_range(), Some(0..3));
    }

    #[test]
    fn one_undo_reverses_replace_current() {
        let mut surface = TextBuffer::from("foo bar");
        find_next(&mut surface, "foo");
        replace_current(&mut surface, "foo", "qux");
        assert_eq!(surface.text(), "qux bar");

        assert!(surface.undo());
        assert_eq!(surface.text(), "foo bar");
    }

    #[test]
    fn replace_current_last_match_reports_not_found_after() {
        let mut surface = TextBuffer::from("one foo");
        find_next(&mut surface, "foo");

        let outcome = replace_current(&mut surface, "foo", "two");
        assert_eq!(surface.text(), "one two");
        assert_eq!(outcome, FindOutcome::NotFound);
    }

    #[test]
    fn replace_all_counts_and_rewrites() {
        let mut surface = TextBuffer::from("foo bar foo");
        assert_eq!(
            replace_all(&mut surface, "foo", "baz"),
            ReplaceOutcome::Replaced(2)
        );
        assert_eq!(surface.text(), "baz bar baz");
    }

    #[test]
    fn replace_all_no_occurrences() {
        let mut surface = TextBuffer::from("foo bar");
        assert_eq!(
            replace_all(&mut surface, "qux", "baz"),
            ReplaceOutcome::NoOccurrences
        );
        assert_eq!(surface.text(), "foo bar");
        assert!(!surface.is_modified());
    }
}
