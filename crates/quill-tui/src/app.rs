//! The application loop: key handling, modal prompt flows, status
//! messages.
//!
//! Prompts collect the user's answer first, then drive the core through
//! [`Replies`], so save/close logic lives in one place and the frontend
//! only gathers input.

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use quill_core::event::EventStream;
use quill_core::{
    startup, CloseChoice, CloseOutcome, CoreError, Editor, FindOutcome, OpenRequests, Replies,
    ReplaceOutcome, SessionEvent,
};

use crate::view::{self, Overlay};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Lines jumped by PageUp/PageDown.
const PAGE_LINES: usize = 20;

/// Frontend state around the editor core.
pub struct App {
    pub(crate) editor: Editor,
    pub(crate) status: Option<String>,
    pub(crate) scroll: usize,
    requests: OpenRequests,
    events: EventStream,
    last_query: Option<String>,
    should_quit: bool,
}

/// Sets up the terminal, runs the application until quit, restores the
/// terminal.
pub fn run(editor: Editor, requests: OpenRequests) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = App::new(editor, requests).main_loop(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

impl App {
    /// Creates the app around an editor and its open-request queue.
    pub fn new(editor: Editor, requests: OpenRequests) -> Self {
        let events = editor.events();
        Self {
            editor,
            status: None,
            scroll: 0,
            requests,
            events,
            last_query: None,
            should_quit: false,
        }
    }

    fn main_loop(mut self, terminal: &mut Term) -> Result<()> {
        // Open everything queued before the frontend existed (CLI args,
        // early host notifications), then fall back to a blank document.
        let failures = startup::run_startup(&mut self.editor, &mut self.requests);
        self.report_open_failures(&failures);

        while !self.should_quit {
            self.drain_background();
            terminal.draw(|frame| view::render(frame, &mut self, None))?;

            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Release {
                        self.handle_key(terminal, key)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Drains host open requests and session events between keystrokes.
    /// Late open requests take the same path as a user-initiated open.
    fn drain_background(&mut self) {
        let failures = startup::drain_into(&mut self.editor, &mut self.requests);
        self.report_open_failures(&failures);
        while let Some(event) = self.events.try_next() {
            match event {
                SessionEvent::Saved { name, .. } => {
                    self.status = Some(format!("Saved {name}"));
                }
                SessionEvent::Closed { name, .. } => {
                    self.status = Some(format!("Closed {name}"));
                }
                SessionEvent::Opened { .. } | SessionEvent::Focused { .. } => {}
            }
        }
    }

    fn handle_key(&mut self, terminal: &mut Term, key: KeyEvent) -> Result<()> {
        self.status = None;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('q') if ctrl => self.request_quit(terminal)?,
            KeyCode::Char('n') if ctrl => {
                self.editor.new_session();
                self.scroll = 0;
            }
            KeyCode::Char('o') if ctrl => self.open_prompt(terminal)?,
            KeyCode::Char('s') if ctrl => self.save_flow(terminal, false)?,
            KeyCode::F(2) => self.save_flow(terminal, true)?,
            KeyCode::Char('w') if ctrl => self.close_active(terminal)?,
            KeyCode::Char('f') if ctrl => self.find_prompt(terminal)?,
            KeyCode::F(3) => self.find_again(),
            KeyCode::Char('h') if ctrl => self.replace_dialog(terminal)?,
            KeyCode::Char('z') if ctrl => {
                if let Some(session) = self.editor.active_mut() {
                    session.surface_mut().undo();
                }
            }
            KeyCode::Char('y') if ctrl => {
                if let Some(session) = self.editor.active_mut() {
                    session.surface_mut().redo();
                }
            }
            KeyCode::Right if alt => self.cycle_tab(1),
            KeyCode::Left if alt => self.cycle_tab(-1),
            _ => self.handle_edit_key(key)?,
        }
        Ok(())
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let tab_width = self.editor.config().tab_width;

        let Some(session) = self.editor.active_mut() else {
            return Ok(());
        };
        let surface = session.surface_mut();

        match key.code {
            KeyCode::Up => surface.move_up(1),
            KeyCode::Down => surface.move_down(1),
            KeyCode::Left => surface.move_left(),
            KeyCode::Right => surface.move_right(),
            KeyCode::Home => surface.move_to_line_start(),
            KeyCode::End => surface.move_to_line_end(),
            KeyCode::PageUp => surface.move_up(PAGE_LINES),
            KeyCode::PageDown => surface.move_down(PAGE_LINES),
            KeyCode::Enter => surface.insert_at_cursor("\n")?,
            KeyCode::Tab => surface.insert_at_cursor(&" ".repeat(tab_width))?,
            KeyCode::Backspace => surface.delete_backward()?,
            KeyCode::Delete => surface.delete_forward()?,
            KeyCode::Char(c) if !ctrl && !alt => {
                surface.insert_at_cursor(&c.to_string())?;
            }
            _ => {}
        }
        Ok(())
    }

    fn cycle_tab(&mut self, delta: isize) {
        let len = self.editor.sessions().len() as isize;
        let Some(active) = self.editor.sessions().active_index() else {
            return;
        };
        if len == 0 {
            return;
        }
        let next = (active as isize + delta).rem_euclid(len) as usize;
        let _ = self.editor.activate(next);
    }

    // ==================== Flows ====================

    fn open_prompt(&mut self, terminal: &mut Term) -> Result<()> {
        let hint = Some(self.filter_hint());
        let Some(path) = self.prompt_input(terminal, "Open file", "", hint.as_deref())? else {
            return Ok(());
        };
        let path = path.trim();
        if path.is_empty() {
            return Ok(());
        }
        match self.editor.open_path(path) {
            Ok(_) => self.scroll = 0,
            Err(err) => {
                tracing::warn!("open failed: {err}");
                self.status = Some(format!("Could not open {path}: {err}"));
            }
        }
        Ok(())
    }

    fn save_flow(&mut self, terminal: &mut Term, force_prompt: bool) -> Result<()> {
        let (needs_path, initial) = match self.editor.active() {
            Some(session) => (
                force_prompt || session.path().is_none(),
                session
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            None => return Ok(()),
        };

        let mut replies = Replies::default();
        if needs_path {
            let hint = Some(self.filter_hint());
            match self.prompt_input(terminal, "Save as", &initial, hint.as_deref())? {
                Some(path) if !path.trim().is_empty() => {
                    replies = Replies::save_to(PathBuf::from(path.trim()));
                }
                // Dismissed: silent abort, no side effect.
                _ => return Ok(()),
            }
        }

        if let Err(err) = self.editor.save_active(&mut replies, force_prompt) {
            tracing::warn!("save failed: {err}");
            self.status = Some(format!("Could not save: {err}"));
        }
        Ok(())
    }

    fn close_active(&mut self, terminal: &mut Term) -> Result<()> {
        let Some(index) = self.editor.sessions().active_index() else {
            return Ok(());
        };
        self.close_at(terminal, index)?;
        Ok(())
    }

    /// Collects prompt answers for one close, then runs the core flow.
    fn close_at(&mut self, terminal: &mut Term, index: usize) -> Result<CloseOutcome> {
        let _ = self.editor.activate(index);
        let (modified, unbound, name) = match self.editor.sessions().get(index) {
            Some(session) => (
                session.is_modified(),
                session.path().is_none(),
                session.name().to_string(),
            ),
            None => return Ok(CloseOutcome::Cancelled),
        };

        let mut replies = Replies::default();
        if modified {
            let choice = self.prompt_close(terminal, &name)?;
            if choice == CloseChoice::Cancel {
                return Ok(CloseOutcome::Cancelled);
            }
            replies = Replies::close_with(choice);

            if choice == CloseChoice::Save && unbound {
                let hint = Some(self.filter_hint());
                match self.prompt_input(terminal, "Save as", "", hint.as_deref())? {
                    Some(path) if !path.trim().is_empty() => {
                        replies = replies.and_save_to(PathBuf::from(path.trim()));
                    }
                    // Cancelled path prompt aborts the close.
                    _ => return Ok(CloseOutcome::Cancelled),
                }
            }
        }

        match self.editor.close_session(index, &mut replies) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                tracing::warn!("close failed: {err}");
                self.status = Some(format!("Could not save: {err}"));
                Ok(CloseOutcome::Cancelled)
            }
        }
    }

    /// Whole-window close: every session in tab order; the first Cancel
    /// keeps the application (and all remaining sessions) open.
    fn request_quit(&mut self, terminal: &mut Term) -> Result<()> {
        while !self.editor.sessions().is_empty() {
            match self.close_at(terminal, 0)? {
                CloseOutcome::Closed => {}
                CloseOutcome::Cancelled => return Ok(()),
            }
        }
        self.should_quit = true;
        Ok(())
    }

    fn find_prompt(&mut self, terminal: &mut Term) -> Result<()> {
        let initial = self.last_query.clone().unwrap_or_default();
        let Some(query) = self.prompt_input(terminal, "Find", &initial, None)? else {
            return Ok(());
        };
        if query.is_empty() {
            return Ok(());
        }
        self.last_query = Some(query.clone());
        let outcome = self.editor.find_next(&query);
        self.report_find(outcome, &query);
        Ok(())
    }

    fn find_again(&mut self) {
        if let Some(query) = self.last_query.clone() {
            let outcome = self.editor.find_next(&query);
            self.report_find(outcome, &query);
        }
    }

    fn replace_dialog(&mut self, terminal: &mut Term) -> Result<()> {
        let initial = self.last_query.clone().unwrap_or_default();
        let Some(query) = self.prompt_input(terminal, "Find", &initial, None)? else {
            return Ok(());
        };
        if query.is_empty() {
            return Ok(());
        }
        self.last_query = Some(query.clone());
        let Some(replacement) = self.prompt_input(terminal, "Replace with", "", None)? else {
            return Ok(());
        };

        loop {
            terminal.draw(|frame| {
                view::render(
                    frame,
                    self,
                    Some(&Overlay::ReplaceActions {
                        query: &query,
                        replacement: &replacement,
                    }),
                )
            })?;

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            match key.code {
                KeyCode::Enter | KeyCode::Char('r') => {
                    let outcome = self.editor.replace_current(&query, &replacement);
                    self.report_find(outcome, &query);
                }
                KeyCode::Char('a') => {
                    let outcome = self.editor.replace_all(&query, &replacement);
                    self.report_replace(outcome, &query);
                }
                KeyCode::Char('n') => {
                    let outcome = self.editor.find_next(&query);
                    self.report_find(outcome, &query);
                }
                KeyCode::Esc => break,
                _ => {}
            }
        }
        Ok(())
    }

    /// One status line for any number of failed opens.
    fn report_open_failures(&mut self, failures: &[(PathBuf, CoreError)]) {
        match failures {
            [] => {}
            [(path, err)] => {
                self.status = Some(format!("Could not open {}: {err}", path.display()));
            }
            many => {
                self.status = Some(format!("{} files could not be opened", many.len()));
            }
        }
    }

    fn report_find(&mut self, outcome: FindOutcome, query: &str) {
        self.status = match outcome {
            FindOutcome::Found => None,
            FindOutcome::NotFound => Some(format!("\"{query}\" not found")),
            FindOutcome::EmptyQuery | FindOutcome::NoSession => None,
        };
    }

    fn report_replace(&mut self, outcome: ReplaceOutcome, query: &str) {
        self.status = match outcome {
            ReplaceOutcome::Replaced(count) => Some(format!("Replaced {count} occurrence(s)")),
            ReplaceOutcome::NoOccurrences => Some(format!("No occurrences of \"{query}\"")),
            ReplaceOutcome::EmptyQuery | ReplaceOutcome::NoSession => None,
        };
    }

    fn filter_hint(&self) -> String {
        self.editor
            .config()
            .file_filters
            .iter()
            .map(|f| f.display())
            .collect::<Vec<_>>()
            .join("  ")
    }

    // ==================== Prompts ====================

    /// Synchronous single-line input overlay. `Ok(None)` means the
    /// prompt was dismissed.
    fn prompt_input(
        &mut self,
        terminal: &mut Term,
        title: &str,
        initial: &str,
        hint: Option<&str>,
    ) -> Result<Option<String>> {
        let mut value = initial.to_string();
        loop {
            terminal.draw(|frame| {
                view::render(
                    frame,
                    self,
                    Some(&Overlay::Input {
                        title,
                        value: &value,
                        hint,
                    }),
                )
            })?;

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            match key.code {
                KeyCode::Enter => return Ok(Some(value)),
                KeyCode::Esc => return Ok(None),
                KeyCode::Backspace => {
                    value.pop();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    value.push(c);
                }
                _ => {}
            }
        }
    }

    /// Save/Discard/Cancel overlay for a modified session.
    fn prompt_close(&mut self, terminal: &mut Term, name: &str) -> Result<CloseChoice> {
        loop {
            terminal.draw(|frame| {
                view::render(frame, self, Some(&Overlay::CloseConfirm { name }))
            })?;

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            match key.code {
                KeyCode::Char('s') | KeyCode::Char('S') => return Ok(CloseChoice::Save),
                KeyCode::Char('d') | KeyCode::Char('D') => return Ok(CloseChoice::Discard),
                KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Esc => {
                    return Ok(CloseChoice::Cancel)
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_failure(path: &str) -> (PathBuf, CoreError) {
        (
            PathBuf::from(path),
            CoreError::Io(io::Error::new(io::ErrorKind::NotFound, "missing")),
        )
    }

    #[test]
    fn open_failures_reach_the_status_line() {
        let mut app = App::new(Editor::new(), OpenRequests::new());

        app.report_open_failures(&[]);
        assert!(app.status.is_none());

        app.report_open_failures(&[io_failure("/a.txt")]);
        assert_eq!(
            app.status.as_deref(),
            Some("Could not open /a.txt: IO error: missing")
        );

        app.report_open_failures(&[io_failure("/a.txt"), io_failure("/b.txt")]);
        assert_eq!(app.status.as_deref(), Some("2 files could not be opened"));
    }
}
