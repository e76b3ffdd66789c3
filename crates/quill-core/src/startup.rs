//! Startup open-request sequencing.
//!
//! Open requests arrive from two directions: command-line arguments and
//! host "open this file" notifications, which may fire at any point,
//! including before the frontend exists. Both land in one queue; the
//! frontend drains it at startup before deciding whether to create a
//! default blank document, and keeps draining it every tick so later
//! requests are handled exactly like a user-initiated open. There is no
//! "first open already happened" flag to race against.

use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::editor::Editor;
use crate::CoreError;

/// Queue of pending open requests.
pub struct OpenRequests {
    tx: mpsc::UnboundedSender<PathBuf>,
    rx: mpsc::UnboundedReceiver<PathBuf>,
}

impl OpenRequests {
    /// Creates an empty queue.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Queues a path to open.
    pub fn push(&self, path: PathBuf) {
        // The receiver lives as long as self.
        let _ = self.tx.send(path);
    }

    /// Returns a handle the host integration can queue paths through
    /// from anywhere.
    pub fn sender(&self) -> OpenRequestSender {
        OpenRequestSender(self.tx.clone())
    }

    /// Takes the next pending request, if any.
    pub fn try_next(&mut self) -> Option<PathBuf> {
        self.rx.try_recv().ok()
    }
}

impl Default for OpenRequests {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable handle for queueing open requests.
#[derive(Clone)]
pub struct OpenRequestSender(mpsc::UnboundedSender<PathBuf>);

impl OpenRequestSender {
    /// Queues a path to open.
    pub fn push(&self, path: PathBuf) {
        let _ = self.0.send(path);
    }
}

/// Drains every pending request into the editor in arrival order, then
/// creates one untitled session if nothing ended up open.
///
/// Unreadable paths are returned with their errors for the frontend to
/// surface; they do not stop the remaining paths from opening.
pub fn run_startup(editor: &mut Editor, requests: &mut OpenRequests) -> Vec<(PathBuf, CoreError)> {
    let failures = drain_into(editor, requests);
    if editor.sessions().is_empty() {
        editor.new_session();
    }
    failures
}

/// Drains pending requests into the editor; used at startup and on
/// every frontend tick thereafter.
pub fn drain_into(editor: &mut Editor, requests: &mut OpenRequests) -> Vec<(PathBuf, CoreError)> {
    let mut failures = Vec::new();
    while let Some(path) = requests.try_next() {
        if let Err(err) = editor.open_path(&path) {
            tracing::warn!("could not open {}: {err}", path.display());
            failures.push((path, err));
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn startup_opens_requests_in_order() {
        let a = temp_file("a");
        let b = temp_file("b");

        let mut requests = OpenRequests::new();
        requests.push(a.path().to_path_buf());
        requests.push(b.path().to_path_buf());

        let mut editor = Editor::new();
        let failures = run_startup(&mut editor, &mut requests);

        assert!(failures.is_empty());
        assert_eq!(editor.sessions().len(), 2);
        assert_eq!(editor.sessions().get(0).unwrap().surface().text(), "a");
        assert_eq!(editor.sessions().get(1).unwrap().surface().text(), "b");
        // The last opened tab is active; no blank document was created.
        assert_eq!(editor.sessions().active_index(), Some(1));
    }

    #[test]
    fn startup_without_requests_creates_blank_session() {
        let mut requests = OpenRequests::new();
        let mut editor = Editor::new();

        run_startup(&mut editor, &mut requests);

        assert_eq!(editor.sessions().len(), 1);
        assert_eq!(editor.active().unwrap().name(), "Untitled");
    }

    #[test]
    fn startup_reports_failures_and_continues() {
        let good = temp_file("ok");

        let mut requests = OpenRequests::new();
        requests.push(PathBuf::from("/nonexistent/quill.txt"));
        requests.push(good.path().to_path_buf());

        let mut editor = Editor::new();
        let failures = run_startup(&mut editor, &mut requests);

        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0].1, CoreError::Io(_)));
        // The good path still opened, so no blank document.
        assert_eq!(editor.sessions().len(), 1);
        assert_eq!(editor.active().unwrap().surface().text(), "ok");
    }

    #[test]
    fn startup_with_only_failures_creates_blank_session() {
        let mut requests = OpenRequests::new();
        requests.push(PathBuf::from("/nonexistent/quill.txt"));

        let mut editor = Editor::new();
        let failures = run_startup(&mut editor, &mut requests);

        assert_eq!(failures.len(), 1);
        assert_eq!(editor.sessions().len(), 1);
        assert_eq!(editor.active().unwrap().name(), "Untitled");
    }

    #[test]
    fn sender_handle_queues_from_outside() {
        let file = temp_file("via handle");
        let mut requests = OpenRequests::new();
        let sender = requests.sender();

        // A host notification can arrive before the frontend runs.
        sender.push(file.path().to_path_buf());

        let mut editor = Editor::new();
        run_startup(&mut editor, &mut requests);
        assert_eq!(editor.active().unwrap().surface().text(), "via handle");
    }

    #[test]
    fn later_requests_drain_like_user_opens() {
        let first = temp_file("1");
        let later = temp_file("2");

        let mut requests = OpenRequests::new();
        requests.push(first.path().to_path_buf());

        let mut editor = Editor::new();
        run_startup(&mut editor, &mut requests);
        assert_eq!(editor.sessions().len(), 1);

        // Simulates a host open event after startup, drained on a tick.
        requests.push(later.path().to_path_buf());
        let failures = drain_into(&mut editor, &mut requests);

        assert!(failures.is_empty());
        assert_eq!(editor.sessions().len(), 2);
        assert_eq!(editor.active().unwrap().surface().text(), "2");
    }
}
