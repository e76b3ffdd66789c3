//! Event bus for session notifications.
//!
//! A `tokio::sync::broadcast` channel carries events as values; the
//! frontend drains its receiver each tick for status messages and any
//! number of additional subscribers can listen without coupling to the
//! editor.

use tokio::sync::broadcast;

use crate::session::SessionId;

/// Events emitted by the editor as sessions change.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A session was opened (new document or loaded file)
    Opened { id: SessionId, name: String },
    /// A session was closed
    Closed { id: SessionId, name: String },
    /// A session was saved to its bound path
    Saved { id: SessionId, name: String },
    /// A session became the active tab
    Focused { id: SessionId, name: String },
}

/// Broadcast bus for [`SessionEvent`]s.
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers. Having no subscribers is not
    /// an error.
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribes to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Subscribes with a non-blocking [`EventStream`], for frontends
    /// that drain events once per tick.
    pub fn stream(&self) -> EventStream {
        EventStream {
            rx: self.sender.subscribe(),
        }
    }
}

/// Non-blocking view of a subscription. Lagged messages are dropped
/// with a warning rather than surfaced as errors.
pub struct EventStream {
    rx: broadcast::Receiver<SessionEvent>,
}

impl EventStream {
    /// Returns the next pending event, or `None` when the queue is
    /// empty.
    pub fn try_next(&mut self) -> Option<SessionEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    tracing::warn!("event stream lagged, {missed} events dropped");
                }
                Err(_) => return None,
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
