//! The editor facade.
//!
//! `Editor` owns the session collection, the event bus and the config,
//! and exposes the operations frontends call: open, save, close,
//! find/replace. All of it runs synchronously on the single control
//! thread; user prompts go through the [`Interaction`] seam.

use std::path::Path;

use crate::collection::SessionCollection;
use crate::config::EditorConfig;
use crate::event::{EventBus, SessionEvent};
use crate::persist::{self, CloseChoice, CloseOutcome, Interaction, SaveOutcome};
use crate::search::{self, FindOutcome, ReplaceOutcome};
use crate::session::Session;
use crate::{CoreError, CoreResult};

/// The main editor state.
pub struct Editor {
    /// Open sessions in tab order
    sessions: SessionCollection,

    /// Event bus for session notifications
    bus: EventBus,

    /// Editor configuration (in-memory only)
    config: EditorConfig,
}

impl Editor {
    /// Creates an editor with no open sessions.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Creates an editor with a custom configuration.
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            sessions: SessionCollection::new(),
            bus: EventBus::new(),
            config,
        }
    }

    // ==================== Session Operations ====================

    /// Opens a file, or activates its tab when the exact path is
    /// already open.
    ///
    /// An already-open path is not reloaded from disk; the in-memory
    /// content, edited or not, wins. Read failures surface as
    /// [`CoreError::Io`] and leave the collection unchanged.
    pub fn open_path(&mut self, path: impl AsRef<Path>) -> CoreResult<usize> {
        let path = path.as_ref();

        if let Some(index) = self.sessions.find_by_path(path) {
            self.sessions.activate(index)?;
            self.emit_for(index, |id, name| SessionEvent::Focused { id, name });
            return Ok(index);
        }

        let session = Session::from_file(path)?;
        tracing::info!("opened {}", path.display());

        let index = self.sessions.add(session);
        self.emit_for(index, |id, name| SessionEvent::Opened { id, name });
        self.emit_for(index, |id, name| SessionEvent::Focused { id, name });
        Ok(index)
    }

    /// Creates a new untitled session and activates it.
    pub fn new_session(&mut self) -> usize {
        let index = self.sessions.add(Session::untitled());
        self.emit_for(index, |id, name| SessionEvent::Opened { id, name });
        self.emit_for(index, |id, name| SessionEvent::Focused { id, name });
        index
    }

    /// Activates the tab at `index`.
    pub fn activate(&mut self, index: usize) -> CoreResult<()> {
        self.sessions.activate(index)?;
        self.emit_for(index, |id, name| SessionEvent::Focused { id, name });
        Ok(())
    }

    // ==================== Persistence Controller ====================

    /// Saves the active session to its bound path, prompting for a
    /// destination when unbound or when `force_prompt` is set (save-as).
    ///
    /// A dismissed prompt aborts with no side effect. A write failure
    /// surfaces as [`CoreError::Io`] with the session state unchanged,
    /// modified flag included.
    pub fn save_active(
        &mut self,
        interaction: &mut dyn Interaction,
        force_prompt: bool,
    ) -> CoreResult<SaveOutcome> {
        let index = self
            .sessions
            .active_index()
            .ok_or(CoreError::NoActiveSession)?;
        self.save_session_at(index, interaction, force_prompt)
    }

    /// Saves the session at `index`; same flow as [`Editor::save_active`].
    pub fn save_session_at(
        &mut self,
        index: usize,
        interaction: &mut dyn Interaction,
        force_prompt: bool,
    ) -> CoreResult<SaveOutcome> {
        let target = {
            let session = self.sessions.get(index).ok_or(CoreError::OutOfRange(index))?;
            match session.path() {
                Some(path) if !force_prompt => path.to_path_buf(),
                _ => match interaction.request_save_path(session) {
                    Some(path) => path,
                    None => return Ok(SaveOutcome::Cancelled),
                },
            }
        };

        let session = self
            .sessions
            .get_mut(index)
            .ok_or(CoreError::OutOfRange(index))?;
        persist::write_text(&target, &session.surface().text())?;
        session.rebind(target);
        tracing::debug!("saved {}", session.name());

        self.emit_for(index, |id, name| SessionEvent::Saved { id, name });
        Ok(SaveOutcome::Saved)
    }

    /// Closes the session at `index`.
    ///
    /// Unmodified sessions close without prompting. A modified session
    /// prompts Save/Discard/Cancel; the session is activated for the
    /// prompt and stays active when the close is cancelled. A save-path
    /// prompt dismissed mid-save also cancels the close.
    pub fn close_session(
        &mut self,
        index: usize,
        interaction: &mut dyn Interaction,
    ) -> CoreResult<CloseOutcome> {
        let session = self.sessions.get(index).ok_or(CoreError::OutOfRange(index))?;

        if !session.is_modified() {
            let removed = self.sessions.remove_at(index)?;
            self.bus.emit(SessionEvent::Closed {
                id: removed.id(),
                name: removed.name().to_string(),
            });
            return Ok(CloseOutcome::Closed);
        }

        self.sessions.activate(index)?;
        let choice = {
            let session = self.sessions.get(index).ok_or(CoreError::OutOfRange(index))?;
            interaction.confirm_close(session)
        };

        match choice {
            CloseChoice::Cancel => Ok(CloseOutcome::Cancelled),
            CloseChoice::Discard => {
                let removed = self.sessions.remove_at(index)?;
                self.bus.emit(SessionEvent::Closed {
                    id: removed.id(),
                    name: removed.name().to_string(),
                });
                Ok(CloseOutcome::Closed)
            }
            CloseChoice::Save => match self.save_session_at(index, interaction, false)? {
                SaveOutcome::Cancelled => Ok(CloseOutcome::Cancelled),
                SaveOutcome::Saved => {
                    let removed = self.sessions.remove_at(index)?;
                    self.bus.emit(SessionEvent::Closed {
                        id: removed.id(),
                        name: removed.name().to_string(),
                    });
                    Ok(CloseOutcome::Closed)
                }
            },
        }
    }

    /// Closes every session in tab order, activating each before its
    /// prompt. The first Cancel aborts the whole sequence; all sessions
    /// not yet visited stay open.
    pub fn close_all(&mut self, interaction: &mut dyn Interaction) -> CoreResult<CloseOutcome> {
        while !self.sessions.is_empty() {
            self.sessions.activate(0)?;
            match self.close_session(0, interaction)? {
                CloseOutcome::Cancelled => return Ok(CloseOutcome::Cancelled),
                CloseOutcome::Closed => {}
            }
        }
        Ok(CloseOutcome::Closed)
    }

    // ==================== Find/Replace ====================

    /// Finds the next occurrence of `query` in the active session.
    pub fn find_next(&mut self, query: &str) -> FindOutcome {
        match self.sessions.active_mut() {
            Some(session) => search::find_next(session.surface_mut(), query),
            None => FindOutcome::NoSession,
        }
    }

    /// Replaces the selection when it matches `query`, then advances to
    /// the next occurrence.
    pub fn replace_current(&mut self, query: &str, replacement: &str) -> FindOutcome {
        match self.sessions.active_mut() {
            Some(session) => search::replace_current(session.surface_mut(), query, replacement),
            None => FindOutcome::NoSession,
        }
    }

    /// Replaces all occurrences of `query` in the active session.
    pub fn replace_all(&mut self, query: &str, replacement: &str) -> ReplaceOutcome {
        match self.sessions.active_mut() {
            Some(session) => search::replace_all(session.surface_mut(), query, replacement),
            None => ReplaceOutcome::NoSession,
        }
    }

    // ==================== Access ====================

    /// Returns the session collection.
    pub fn sessions(&self) -> &SessionCollection {
        &self.sessions
    }

    /// Returns the active session.
    pub fn active(&self) -> Option<&Session> {
        self.sessions.active()
    }

    /// Returns a mutable reference to the active session.
    pub fn active_mut(&mut self) -> Option<&mut Session> {
        self.sessions.active_mut()
    }

    /// Returns the editor configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SessionEvent> {
        self.bus.subscribe()
    }

    /// Subscribes with a non-blocking stream, drained per frontend tick.
    pub fn events(&self) -> crate::event::EventStream {
        self.bus.stream()
    }

    fn emit_for(&self, index: usize, make: impl FnOnce(crate::SessionId, String) -> SessionEvent) {
        if let Some(session) = self.sessions.get(index) {
            self.bus.emit(make(session.id(), session.name().to_string()));
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::Write;
    use std::path::PathBuf;

    /// Fails the test when any prompt fires.
    struct NoPrompts;

    impl Interaction for NoPrompts {
        fn request_save_path(&mut self, session: &Session) -> Option<PathBuf> {
            panic!("unexpected save-path prompt for {}", session.name());
        }

        fn confirm_close(&mut self, session: &Session) -> CloseChoice {
            panic!("unexpected close prompt for {}", session.name());
        }
    }

    /// Answers prompts from scripted queues, in order.
    #[derive(Default)]
    struct Scripted {
        paths: VecDeque<Option<PathBuf>>,
        choices: VecDeque<CloseChoice>,
    }

    impl Interaction for Scripted {
        fn request_save_path(&mut self, _session: &Session) -> Option<PathBuf> {
            self.paths.pop_front().expect("no scripted save path")
        }

        fn confirm_close(&mut self, _session: &Session) -> CloseChoice {
            self.choices.pop_front().expect("no scripted close choice")
        }
    }

    fn temp_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn open_path_twice_yields_one_session() {
        let file = temp_file("hello");
        let mut editor = Editor::new();

        let first = editor.open_path(file.path()).unwrap();
        editor.new_session();
        let second = editor.open_path(file.path()).unwrap();

        assert_eq!(first, second);
        assert_eq!(editor.sessions().len(), 2);
        assert_eq!(editor.sessions().active_index(), Some(first));
        assert_eq!(
            editor.sessions().find_by_path(file.path()),
            Some(first)
        );
    }

    #[test]
    fn reopening_does_not_reload_from_disk() {
        let file = temp_file("original");
        let mut editor = Editor::new();
        editor.open_path(file.path()).unwrap();
        editor
            .active_mut()
            .unwrap()
            .surface_mut()
            .insert_at_cursor("edited ")
            .unwrap();

        // The file changes on disk, but reopening keeps the edits.
        std::fs::write(file.path(), "changed externally").unwrap();
        editor.open_path(file.path()).unwrap();

        assert_eq!(
            editor.active().unwrap().surface().text(),
            "edited original"
        );
    }

    #[test]
    fn open_unreadable_path_leaves_collection_unchanged() {
        let mut editor = Editor::new();
        editor.new_session();

        let err = editor.open_path("/nonexistent/quill.txt").unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
        assert_eq!(editor.sessions().len(), 1);
        assert_eq!(editor.sessions().active_index(), Some(0));
    }

    #[test]
    fn save_bound_session_without_prompt() {
        let file = temp_file("before");
        let mut editor = Editor::new();
        editor.open_path(file.path()).unwrap();
        editor
            .active_mut()
            .unwrap()
            .surface_mut()
            .insert_at_cursor("x ")
            .unwrap();

        let outcome = editor.save_active(&mut NoPrompts, false).unwrap();
        assert_eq!(outcome, SaveOutcome::Saved);
        assert!(!editor.active().unwrap().is_modified());
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "x before");
    }

    #[test]
    fn save_unbound_session_prompts_and_rebinds() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("new.txt");

        let mut editor = Editor::new();
        editor.new_session();
        editor
            .active_mut()
            .unwrap()
            .surface_mut()
            .insert_at_cursor("content")
            .unwrap();

        let mut scripted = Scripted {
            paths: VecDeque::from([Some(target.clone())]),
            choices: VecDeque::new(),
        };
        let outcome = editor.save_active(&mut scripted, false).unwrap();

        assert_eq!(outcome, SaveOutcome::Saved);
        let session = editor.active().unwrap();
        assert_eq!(session.path(), Some(target.as_path()));
        assert_eq!(session.name(), "new.txt");
        assert!(!session.is_modified());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "content");
    }

    #[test]
    fn cancelled_save_prompt_has_no_side_effect() {
        let mut editor = Editor::new();
        editor.new_session();
        editor
            .active_mut()
            .unwrap()
            .surface_mut()
            .insert_at_cursor("content")
            .unwrap();

        let mut scripted = Scripted {
            paths: VecDeque::from([None]),
            choices: VecDeque::new(),
        };
        let outcome = editor.save_active(&mut scripted, false).unwrap();

        assert_eq!(outcome, SaveOutcome::Cancelled);
        let session = editor.active().unwrap();
        assert!(session.path().is_none());
        assert!(session.is_modified());
    }

    #[test]
    fn save_as_prompts_even_when_bound() {
        let file = temp_file("data");
        let dir = tempfile::tempdir().unwrap();
        let copy = dir.path().join("copy.txt");

        let mut editor = Editor::new();
        editor.open_path(file.path()).unwrap();

        let mut scripted = Scripted {
            paths: VecDeque::from([Some(copy.clone())]),
            choices: VecDeque::new(),
        };
        editor.save_active(&mut scripted, true).unwrap();

        assert_eq!(editor.active().unwrap().path(), Some(copy.as_path()));
        assert_eq!(std::fs::read_to_string(&copy).unwrap(), "data");
    }

    #[test]
    fn closing_unmodified_session_never_prompts() {
        let mut editor = Editor::new();
        editor.new_session();

        let outcome = editor.close_session(0, &mut NoPrompts).unwrap();
        assert_eq!(outcome, CloseOutcome::Closed);
        assert!(editor.sessions().is_empty());
    }

    #[test]
    fn closing_modified_session_discard() {
        let mut editor = Editor::new();
        editor.new_session();
        editor
            .active_mut()
            .unwrap()
            .surface_mut()
            .insert_at_cursor("x")
            .unwrap();

        let mut scripted = Scripted {
            paths: VecDeque::new(),
            choices: VecDeque::from([CloseChoice::Discard]),
        };
        let outcome = editor.close_session(0, &mut scripted).unwrap();
        assert_eq!(outcome, CloseOutcome::Closed);
        assert!(editor.sessions().is_empty());
    }

    #[test]
    fn closing_modified_session_cancel_keeps_it_open_and_active() {
        let mut editor = Editor::new();
        editor.new_session();
        editor
            .active_mut()
            .unwrap()
            .surface_mut()
            .insert_at_cursor("x")
            .unwrap();
        editor.new_session();

        let mut scripted = Scripted {
            paths: VecDeque::new(),
            choices: VecDeque::from([CloseChoice::Cancel]),
        };
        let outcome = editor.close_session(0, &mut scripted).unwrap();

        assert_eq!(outcome, CloseOutcome::Cancelled);
        assert_eq!(editor.sessions().len(), 2);
        // Activated for the prompt and still active after the cancel.
        assert_eq!(editor.sessions().active_index(), Some(0));
    }

    #[test]
    fn close_save_with_cancelled_path_prompt_aborts_close() {
        let mut editor = Editor::new();
        editor.new_session();
        editor
            .active_mut()
            .unwrap()
            .surface_mut()
            .insert_at_cursor("x")
            .unwrap();

        let mut scripted = Scripted {
            paths: VecDeque::from([None]),
            choices: VecDeque::from([CloseChoice::Save]),
        };
        let outcome = editor.close_session(0, &mut scripted).unwrap();

        assert_eq!(outcome, CloseOutcome::Cancelled);
        assert_eq!(editor.sessions().len(), 1);
        assert!(editor.active().unwrap().is_modified());
    }

    #[test]
    fn close_save_writes_then_removes() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("saved.txt");

        let mut editor = Editor::new();
        editor.new_session();
        editor
            .active_mut()
            .unwrap()
            .surface_mut()
            .insert_at_cursor("keep me")
            .unwrap();

        let mut scripted = Scripted {
            paths: VecDeque::from([Some(target.clone())]),
            choices: VecDeque::from([CloseChoice::Save]),
        };
        let outcome = editor.close_session(0, &mut scripted).unwrap();

        assert_eq!(outcome, CloseOutcome::Closed);
        assert!(editor.sessions().is_empty());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "keep me");
    }

    #[test]
    fn close_all_stops_at_first_cancel() {
        let mut editor = Editor::new();
        // Three sessions: clean, modified (will cancel), clean.
        editor.new_session();
        editor.new_session();
        editor
            .active_mut()
            .unwrap()
            .surface_mut()
            .insert_at_cursor("dirty")
            .unwrap();
        editor.new_session();

        let mut scripted = Scripted {
            paths: VecDeque::new(),
            choices: VecDeque::from([CloseChoice::Cancel]),
        };
        let outcome = editor.close_all(&mut scripted).unwrap();

        assert_eq!(outcome, CloseOutcome::Cancelled);
        // The first clean session closed; the modified one and the one
        // after it stay open.
        assert_eq!(editor.sessions().len(), 2);
    }

    #[test]
    fn close_all_visits_in_tab_order() {
        let mut editor = Editor::new();
        editor.new_session();
        editor.new_session();

        let outcome = editor.close_all(&mut NoPrompts).unwrap();
        assert_eq!(outcome, CloseOutcome::Closed);
        assert!(editor.sessions().is_empty());
    }

    #[test]
    fn find_and_replace_require_a_session() {
        let mut editor = Editor::new();
        assert_eq!(editor.find_next("x"), FindOutcome::NoSession);
        assert_eq!(editor.replace_all("x", "y"), ReplaceOutcome::NoSession);
    }

    #[test]
    fn replace_all_scenario() {
        let mut editor = Editor::new();
        editor.new_session();
        editor
            .active_mut()
            .unwrap()
            .surface_mut()
            .insert_at_cursor("foo bar foo")
            .unwrap();

        let outcome = editor.replace_all("foo", "baz");
        assert_eq!(outcome, ReplaceOutcome::Replaced(2));
        assert_eq!(editor.active().unwrap().surface().text(), "baz bar baz");
    }

    #[tokio::test]
    async fn events_flow_through_the_bus() {
        let mut editor = Editor::new();
        let mut rx = editor.subscribe();

        editor.new_session();

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, SessionEvent::Opened { name, .. } if name == "Untitled"));
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, SessionEvent::Focused { .. }));
    }
}
