//! Transport-level error types.
//!
//! Everything that can go wrong while opening the event stream or reading
//! its body. Any of these ends the current query.

use std::fmt;

/// Transport failure for one streamed query.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Connection to the agent backend failed.
    ConnectionFailed {
        url: String,
        message: String,
    },

    /// Request timed out before the stream opened.
    Timeout {
        url: String,
    },

    /// The backend answered with a non-2xx status.
    HttpStatus {
        status: u16,
        message: String,
    },

    /// Reading the response body failed after the stream opened.
    Body {
        message: String,
    },

    /// The configured URL could not be used.
    InvalidUrl {
        url: String,
    },

    /// The read loop was cancelled by its owner.
    Cancelled,

    /// Anything reqwest reports that does not fit above.
    Other {
        message: String,
    },
}

impl TransportError {
    /// Check if resubmitting may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::ConnectionFailed { .. }
            | TransportError::Timeout { .. }
            | TransportError::Body { .. } => true,
            TransportError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            TransportError::InvalidUrl { .. }
            | TransportError::Cancelled
            | TransportError::Other { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::ConnectionFailed { .. } => {
                "Unable to connect to the agent backend.".to_string()
            }
            TransportError::Timeout { .. } => {
                "The agent backend did not respond in time.".to_string()
            }
            TransportError::HttpStatus { status, message } => match *status {
                400 | 422 => "The agent backend rejected the query.".to_string(),
                404 => "The streaming endpoint was not found on the agent backend.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 if !message.is_empty() => {
                    format!("The agent backend failed (HTTP {}): {}", status, message)
                }
                _ => format!("The agent backend returned HTTP {}.", status),
            },
            TransportError::Body { .. } => {
                "The connection was lost while the answer was streaming.".to_string()
            }
            TransportError::InvalidUrl { url } => {
                format!("The agent backend URL '{}' is not valid.", url)
            }
            TransportError::Cancelled => "The request was cancelled.".to_string(),
            TransportError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            TransportError::ConnectionFailed { .. } => "E_NET_CONN",
            TransportError::Timeout { .. } => "E_NET_TIMEOUT",
            TransportError::HttpStatus { .. } => "E_NET_HTTP",
            TransportError::Body { .. } => "E_NET_BODY",
            TransportError::InvalidUrl { .. } => "E_NET_URL",
            TransportError::Cancelled => "E_NET_CANCEL",
            TransportError::Other { .. } => "E_NET_OTHER",
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::ConnectionFailed { url, message } => {
                write!(f, "Connection failed to '{}': {}", url, message)
            }
            TransportError::Timeout { url } => write!(f, "Request to '{}' timed out", url),
            TransportError::HttpStatus { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            TransportError::Body { message } => write!(f, "Stream body error: {}", message),
            TransportError::InvalidUrl { url } => write!(f, "Invalid URL: {}", url),
            TransportError::Cancelled => write!(f, "Request cancelled"),
            TransportError::Other { message } => write!(f, "Transport error: {}", message),
        }
    }
}

impl std::error::Error for TransportError {}

/// Classify a reqwest error into a TransportError.
pub fn classify_reqwest_error(err: &reqwest::Error, url: &str) -> TransportError {
    if err.is_builder() {
        TransportError::InvalidUrl {
            url: url.to_string(),
        }
    } else if err.is_connect() {
        TransportError::ConnectionFailed {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else if err.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else if err.is_body() || err.is_decode() {
        TransportError::Body {
            message: err.to_string(),
        }
    } else if let Some(status) = err.status() {
        TransportError::HttpStatus {
            status: status.as_u16(),
            message: err.to_string(),
        }
    } else {
        TransportError::Other {
            message: err.to_string(),
        }
    }
}
