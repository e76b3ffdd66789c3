//! Editor configuration.
//!
//! Held in memory only: nothing is read from or written to disk, and no
//! environment variables are consulted. The serde derives exist so a
//! frontend embedding the editor can ship its own settings format.

use serde::{Deserialize, Serialize};

/// Main editor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Spaces inserted per Tab key press
    pub tab_width: usize,

    /// Whether the line-number gutter is drawn
    pub show_line_numbers: bool,

    /// Whether the cursor line is highlighted
    pub highlight_current_line: bool,

    /// Filters offered by open/save prompts. Cosmetic only: they never
    /// restrict what can actually be read or written.
    pub file_filters: Vec<FileFilter>,
}

/// One entry of the open/save filter list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFilter {
    /// Human-readable label
    pub label: String,

    /// Extensions without the dot; empty means "all files"
    pub extensions: Vec<String>,
}

impl FileFilter {
    /// Creates a filter from a label and extension list.
    pub fn new(label: &str, extensions: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Returns a display string like `Text Files (*.txt *.md)`.
    pub fn display(&self) -> String {
        if self.extensions.is_empty() {
            format!("{} (*)", self.label)
        } else {
            let globs: Vec<String> = self.extensions.iter().map(|e| format!("*.{e}")).collect();
            format!("{} ({})", self.label, globs.join(" "))
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            show_line_numbers: true,
            highlight_current_line: true,
            file_filters: vec![
                FileFilter::new("Text Files", &["txt", "md"]),
                FileFilter::new("Source Files", &["rs", "c", "cpp", "h", "py", "js"]),
                FileFilter::new("All Files", &[]),
            ],
        }
    }
}
