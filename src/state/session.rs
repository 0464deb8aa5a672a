//! Session handle for one conversation.
//!
//! The backend issues a session ID in a `session` frame. Every later query
//! in the same conversation sends it back so the server can find its
//! conversational state.

use tracing::debug;

/// Holds at most one server-issued session ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRegistry {
    session_id: Option<String>,
}

impl SessionRegistry {
    /// Create a registry with no session
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a session ID. The last value received wins.
    ///
    /// Returns true if the stored value changed.
    pub fn set(&mut self, session_id: impl Into<String>) -> bool {
        let session_id = session_id.into();
        if self.session_id.as_deref() == Some(session_id.as_str()) {
            return false;
        }
        if let Some(previous) = &self.session_id {
            debug!("Session ID replaced: {} -> {}", previous, session_id);
        } else {
            debug!("Session ID captured: {}", session_id);
        }
        self.session_id = Some(session_id);
        true
    }

    /// The current session ID, if one has been received
    pub fn current(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Whether a session ID has been received
    pub fn is_set(&self) -> bool {
        self.session_id.is_some()
    }
}
