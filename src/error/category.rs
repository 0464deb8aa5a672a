//! Error category classification for unified error handling.
//!
//! Categories let the conversation layer decide how a failure surfaces:
//! whether it ends the current query, whether the user can simply try
//! again, and which hint to show next to the error.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, timeout or a body that stopped mid-stream.
    Network,

    /// The backend answered with a non-success status.
    Server,

    /// The user asked for something the conversation cannot do right now
    /// (empty query, a query while another one is streaming).
    User,

    /// Invalid client configuration (bad base URL, bad timeout).
    Configuration,
}

impl ErrorCategory {
    /// Returns true if resubmitting the same query may succeed.
    ///
    /// Nothing in this crate retries automatically; this only drives the
    /// hint shown to the user.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::User => "user",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check that the agent backend is reachable and try again",
            ErrorCategory::Server => {
                "The agent backend may be experiencing issues. Please try again later"
            }
            ErrorCategory::User => "Wait for the current answer to finish, then ask again",
            ErrorCategory::Configuration => "Check the CHATSTREAM_* environment variables",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
