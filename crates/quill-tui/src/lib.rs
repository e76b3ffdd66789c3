//! # Quill TUI
//!
//! The terminal frontend: a tab bar, a line-numbered text area with
//! regex keyword highlighting, a status line, and modal prompts for
//! find/replace, save paths and close confirmation.
//!
//! All rendering and input handling runs on the single control thread;
//! prompts are synchronous overlay loops, the terminal analogue of a
//! modal dialog.

mod app;
mod highlight;
mod view;

pub use app::{run, App};
