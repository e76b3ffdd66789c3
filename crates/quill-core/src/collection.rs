//! The tab manager: an ordered collection of sessions.
//!
//! Insertion order is tab order. The collection owns each session
//! exclusively and tracks which one is active; `active` is `Some` iff
//! the collection is non-empty.

use std::path::Path;

use crate::session::Session;
use crate::{CoreError, CoreResult};

/// Ordered collection of open sessions with one active tab.
#[derive(Default)]
pub struct SessionCollection {
    /// Sessions in tab order
    sessions: Vec<Session>,

    /// Index of the active session, valid iff `sessions` is non-empty
    active: Option<usize>,
}

impl SessionCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a session and makes it active. Returns its tab index.
    pub fn add(&mut self, session: Session) -> usize {
        self.sessions.push(session);
        let index = self.sessions.len() - 1;
        self.active = Some(index);
        index
    }

    /// Makes the session at `index` active.
    pub fn activate(&mut self, index: usize) -> CoreResult<()> {
        if index >= self.sessions.len() {
            return Err(CoreError::OutOfRange(index));
        }
        self.active = Some(index);
        Ok(())
    }

    /// Removes and returns the session at `index`.
    ///
    /// If the removed session was active, the session that shifted into
    /// its slot becomes active, clamped to the last index when the
    /// removed slot was last; the active index becomes `None` when the
    /// collection empties.
    pub fn remove_at(&mut self, index: usize) -> CoreResult<Session> {
        if index >= self.sessions.len() {
            return Err(CoreError::OutOfRange(index));
        }
        let removed = self.sessions.remove(index);

        self.active = if self.sessions.is_empty() {
            None
        } else {
            match self.active {
                Some(active) if active == index => Some(index.min(self.sessions.len() - 1)),
                Some(active) if active > index => Some(active - 1),
                other => other,
            }
        };

        Ok(removed)
    }

    /// Finds the tab index of a session bound to exactly `path`.
    pub fn find_by_path(&self, path: &Path) -> Option<usize> {
        self.sessions.iter().position(|s| s.path() == Some(path))
    }

    /// Returns the active session.
    pub fn active(&self) -> Option<&Session> {
        self.active.map(|i| &self.sessions[i])
    }

    /// Returns a mutable reference to the active session.
    pub fn active_mut(&mut self) -> Option<&mut Session> {
        self.active.map(|i| &mut self.sessions[i])
    }

    /// Returns the active tab index.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Returns the session at `index`.
    pub fn get(&self, index: usize) -> Option<&Session> {
        self.sessions.get(index)
    }

    /// Returns a mutable reference to the session at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Session> {
        self.sessions.get_mut(index)
    }

    /// Iterates sessions in tab order.
    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    /// Returns the number of open sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if no sessions are open.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn bound(path: &str) -> Session {
        let mut s = Session::untitled();
        s.rebind(PathBuf::from(path));
        s
    }

    #[test]
    fn add_activates_new_session() {
        let mut tabs = SessionCollection::new();
        assert!(tabs.active().is_none());

        tabs.add(Session::untitled());
        tabs.add(Session::untitled());
        assert_eq!(tabs.active_index(), Some(1));
        assert_eq!(tabs.len(), 2);
    }

    #[test]
    fn activate_out_of_range() {
        let mut tabs = SessionCollection::new();
        tabs.add(Session::untitled());
        assert!(matches!(tabs.activate(1), Err(CoreError::OutOfRange(1))));
        assert!(tabs.activate(0).is_ok());
    }

    #[test]
    fn remove_shifts_active_into_slot_then_empties() {
        // add A, add B: active is B at index 1.
        let mut tabs = SessionCollection::new();
        tabs.add(bound("/a"));
        tabs.add(bound("/b"));
        assert_eq!(tabs.active_index(), Some(1));

        // removeAt(0): B shifts into slot 0 and stays active.
        tabs.remove_at(0).unwrap();
        assert_eq!(tabs.active_index(), Some(0));
        assert_eq!(tabs.active().unwrap().path(), Some(Path::new("/b")));

        // removeAt(0): empty collection, no active index.
        tabs.remove_at(0).unwrap();
        assert!(tabs.is_empty());
        assert_eq!(tabs.active_index(), None);
    }

    #[test]
    fn remove_last_slot_clamps_active() {
        let mut tabs = SessionCollection::new();
        tabs.add(bound("/a"));
        tabs.add(bound("/b"));
        tabs.add(bound("/c"));
        tabs.activate(2).unwrap();

        tabs.remove_at(2).unwrap();
        assert_eq!(tabs.active_index(), Some(1));
        assert_eq!(tabs.active().unwrap().path(), Some(Path::new("/b")));
    }

    #[test]
    fn remove_before_active_shifts_it_left() {
        let mut tabs = SessionCollection::new();
        tabs.add(bound("/a"));
        tabs.add(bound("/b"));
        tabs.add(bound("/c"));
        tabs.activate(2).unwrap();

        tabs.remove_at(0).unwrap();
        assert_eq!(tabs.active_index(), Some(1));
        assert_eq!(tabs.active().unwrap().path(), Some(Path::new("/c")));
    }

    #[test]
    fn remove_out_of_range() {
        let mut tabs = SessionCollection::new();
        assert!(matches!(tabs.remove_at(0), Err(CoreError::OutOfRange(0))));
    }

    #[test]
    fn find_by_path_is_exact() {
        let mut tabs = SessionCollection::new();
        tabs.add(bound("/x/a.txt"));
        tabs.add(Session::untitled());

        assert_eq!(tabs.find_by_path(Path::new("/x/a.txt")), Some(0));
        assert_eq!(tabs.find_by_path(Path::new("/x/b.txt")), None);
        assert_eq!(tabs.find_by_path(Path::new("a.txt")), None);
    }
}
