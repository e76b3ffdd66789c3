//! Regex keyword highlighting.
//!
//! One fixed keyword table applied per visible line, plus string
//! literals and line comments. Byte ranges come out non-overlapping
//! with comments taking precedence over strings, and strings over
//! keywords.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// What a highlighted range is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Keyword,
    Str,
    Comment,
}

fn keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(if|else|for|while|match|return|break|continue|fn|let|mut|const|static|struct|enum|impl|trait|pub|use|mod|int|double|float|char|void|class|def|import|from)\b",
        )
        .expect("keyword regex")
    })
}

fn string_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""(?:[^"\\]|\\.)*""#).expect("string regex"))
}

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(//|#)").expect("comment regex"))
}

/// Returns the highlighted byte ranges of one line, sorted and
/// non-overlapping.
pub fn spans(line: &str) -> Vec<(Range<usize>, Kind)> {
    let mut out: Vec<(Range<usize>, Kind)> = Vec::new();

    let strings: Vec<Range<usize>> = string_re()
        .find_iter(line)
        .map(|m| m.start()..m.end())
        .collect();

    // First comment marker that does not sit inside a string literal.
    let comment_start = comment_re()
        .find_iter(line)
        .map(|m| m.start())
        .find(|&s| !strings.iter().any(|r| r.contains(&s)));

    let code_end = comment_start.unwrap_or(line.len());

    for range in &strings {
        if range.start < code_end {
            out.push((range.clone(), Kind::Str));
        }
    }

    for m in keyword_re().find_iter(&line[..code_end]) {
        let range = m.start()..m.end();
        if !strings.iter().any(|s| overlaps(s, &range)) {
            out.push((range, Kind::Keyword));
        }
    }

    if let Some(start) = comment_start {
        out.push((start..line.len(), Kind::Comment));
    }

    out.sort_by_key(|(r, _)| r.start);
    out
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}
