//! Unified error type for the chatstream crate.
//!
//! `ChatError` wraps each domain error so callers that drive a whole query
//! (the CLI, an embedding UI) can handle every failure through one type
//! with consistent categorization and user messaging.

use std::fmt;

use super::category::ErrorCategory;
use super::conversation::ConversationError;
use super::transport::{classify_reqwest_error, TransportError};
use crate::config::ConfigError;

/// Unified error type.
#[derive(Debug)]
pub enum ChatError {
    /// Opening or reading the event stream failed.
    Transport(TransportError),

    /// The conversation refused the request.
    Conversation(ConversationError),

    /// Invalid client configuration.
    Config(ConfigError),
}

impl ChatError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::Transport(err) => match err {
                TransportError::HttpStatus { .. } => ErrorCategory::Server,
                TransportError::InvalidUrl { .. } => ErrorCategory::Configuration,
                TransportError::Cancelled => ErrorCategory::User,
                _ => ErrorCategory::Network,
            },
            ChatError::Conversation(_) => ErrorCategory::User,
            ChatError::Config(_) => ErrorCategory::Configuration,
        }
    }

    /// Check if resubmitting the query may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::Transport(err) => err.is_retryable(),
            ChatError::Conversation(_) | ChatError::Config(_) => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Transport(err) => err.user_message(),
            ChatError::Conversation(err) => err.user_message(),
            ChatError::Config(err) => err.to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::Transport(err) => err.error_code(),
            ChatError::Conversation(err) => err.error_code(),
            ChatError::Config(_) => "E_CONFIG",
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Transport(err) => write!(f, "{}", err),
            ChatError::Conversation(err) => write!(f, "{}", err),
            ChatError::Config(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::Transport(err) => Some(err),
            ChatError::Conversation(err) => Some(err),
            ChatError::Config(err) => Some(err),
        }
    }
}

// ============================================================================
// From implementations for automatic error conversion
// ============================================================================

impl From<TransportError> for ChatError {
    fn from(err: TransportError) -> Self {
        ChatError::Transport(err)
    }
}

impl From<ConversationError> for ChatError {
    fn from(err: ConversationError) -> Self {
        ChatError::Conversation(err)
    }
}

impl From<ConfigError> for ChatError {
    fn from(err: ConfigError) -> Self {
        ChatError::Config(err)
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        ChatError::Transport(classify_reqwest_error(&err, &url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_transport_categories() {
        let status: ChatError = TransportError::HttpStatus {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert_eq!(status.category(), ErrorCategory::Server);
        assert!(status.is_retryable());

        let conn: ChatError = TransportError::ConnectionFailed {
            url: "http://localhost:8000".to_string(),
            message: "refused".to_string(),
        }
        .into();
        assert_eq!(conn.category(), ErrorCategory::Network);

        let url: ChatError = TransportError::InvalidUrl {
            url: "nope".to_string(),
        }
        .into();
        assert_eq!(url.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_conversation_error_is_user_category() {
        let err: ChatError = ConversationError::StreamInProgress.into();
        assert_eq!(err.category(), ErrorCategory::User);
        assert_eq!(err.error_code(), "E_CONV_BUSY");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_rejected_query_hint() {
        let busy: ChatError = ConversationError::StreamInProgress.into();
        assert_eq!(
            busy.recovery_hint(),
            "Wait for the current answer to finish, then ask again"
        );
        assert!(!busy.is_retryable());
    }

    #[test]
    fn test_display_delegates() {
        let err: ChatError = TransportError::Cancelled.into();
        assert_eq!(err.to_string(), "Request cancelled");
        assert_eq!(err.recovery_hint(), ErrorCategory::User.recovery_hint());
    }
}
