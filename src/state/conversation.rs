//! Append-only message log for one conversation.

use std::sync::Arc;

use serde::Serialize;

use crate::models::{Message, MessageRole};

/// Ordered log of every message in the conversation.
///
/// Messages are only ever pushed; existing messages are only ever
/// appended to, through [`active_assistant_mut`](Self::active_assistant_mut).
/// Observers therefore always see a prefix-consistent view.
///
/// Messages are shared with published snapshots. Only the active assistant
/// message is ever copied, when it is written while a snapshot still holds it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversationState {
    messages: Vec<Arc<Message>>,
}

impl ConversationState {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a submitted user query
    pub fn push_user(&mut self, content: impl Into<String>) -> u64 {
        let id = self.next_id();
        self.messages.push(Arc::new(Message::user(id, content)));
        id
    }

    /// Push the empty assistant message the stream will fill
    pub fn push_assistant_placeholder(&mut self) -> u64 {
        let id = self.next_id();
        self.messages.push(Arc::new(Message::assistant_placeholder(id)));
        id
    }

    /// The assistant message currently receiving frames, if any
    pub fn active_assistant(&self) -> Option<&Message> {
        self.last()
            .filter(|m| m.role == MessageRole::Assistant && m.is_streaming())
    }

    /// Mutable access to the assistant message currently receiving frames
    pub fn active_assistant_mut(&mut self) -> Option<&mut Message> {
        self.messages
            .last_mut()
            .filter(|m| m.role == MessageRole::Assistant && m.is_streaming())
            .map(Arc::make_mut)
    }

    /// All messages in order
    pub fn messages(&self) -> &[Arc<Message>] {
        &self.messages
    }

    /// The most recent message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last().map(Arc::as_ref)
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether no message has been added yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn next_id(&self) -> u64 {
        self.messages.len() as u64
    }
}
