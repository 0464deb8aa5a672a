use serde::{Deserialize, Serialize};

/// Body of the streaming query request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRequest {
    /// The user's question
    pub query: String,
    /// Session ID from an earlier `session` frame; sent as `null` until one
    /// has been received
    pub session_id: Option<String>,
}

impl QueryRequest {
    /// Create a request, threading through the current session ID
    pub fn new(query: impl Into<String>, session_id: Option<&str>) -> Self {
        Self {
            query: query.into(),
            session_id: session_id.map(String::from),
        }
    }
}
