//! Errors raised by the conversation state machine itself.

use thiserror::Error;

/// Rejections from [`Conversation`](crate::conversation::Conversation)
/// and its task handle.
///
/// None of these touch conversation state: a rejected submission leaves
/// every message exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("A response is already streaming")]
    StreamInProgress,

    #[error("Query is empty")]
    EmptyQuery,

    #[error("Conversation has been closed")]
    Closed,
}

impl ConversationError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ConversationError::StreamInProgress => {
                "Please wait for the current response to complete before sending another message."
                    .to_string()
            }
            ConversationError::EmptyQuery => "Type a question first.".to_string(),
            ConversationError::Closed => "This conversation has been closed.".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConversationError::StreamInProgress => "E_CONV_BUSY",
            ConversationError::EmptyQuery => "E_CONV_EMPTY",
            ConversationError::Closed => "E_CONV_CLOSED",
        }
    }
}
