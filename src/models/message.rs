use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tools::ToolCallRecord;

/// Shown in place of an assistant answer that finished with no text.
pub const FALLBACK_RESPONSE: &str = "The agent finished without producing an answer.";

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Lifecycle of a message's content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// Tokens are still arriving
    Streaming,
    /// The stream ended normally
    Complete,
    /// The stream broke off after some content arrived; content is partial
    Incomplete,
    /// The stream failed before producing any content
    Failed,
}

/// One entry in the conversation log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Position-derived ID, unique within one conversation
    pub id: u64,
    /// Role of the message sender
    pub role: MessageRole,
    /// Text content; only ever appended to
    pub content: String,
    /// Transient label while a tool is running (e.g. "run_cypher")
    #[serde(default)]
    pub tool_status: Option<String>,
    /// Finished tool calls in start order
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRecord>,
    /// Whether content is still growing, and how it ended
    pub status: MessageStatus,
    /// When the message was created
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// A submitted user query
    pub fn user(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            role: MessageRole::User,
            content: content.into(),
            tool_status: None,
            tool_calls: Vec::new(),
            status: MessageStatus::Complete,
            created_at: Utc::now(),
        }
    }

    /// Empty assistant message that tokens stream into
    pub fn assistant_placeholder(id: u64) -> Self {
        Self {
            id,
            role: MessageRole::Assistant,
            content: String::new(),
            tool_status: None,
            tool_calls: Vec::new(),
            status: MessageStatus::Streaming,
            created_at: Utc::now(),
        }
    }

    /// Whether the message is still receiving frames
    pub fn is_streaming(&self) -> bool {
        self.status == MessageStatus::Streaming
    }

    /// Append a token to the content during streaming
    pub fn append_token(&mut self, token: &str) {
        self.content.push_str(token);
    }

    /// Append an application error reported by the agent
    pub fn append_error(&mut self, detail: &str) {
        self.append_suffix("Error", detail);
    }

    /// Append a transport failure
    pub fn append_connection_error(&mut self, detail: &str) {
        self.append_suffix("Connection error", detail);
    }

    fn append_suffix(&mut self, label: &str, detail: &str) {
        if !self.content.is_empty() {
            self.content.push_str("\n\n");
        }
        self.content.push_str(&format!("**{}:** {}", label, detail));
    }

    /// Show which tool is running
    pub fn set_tool_status(&mut self, tool: &str) {
        self.tool_status = Some(tool.to_string());
    }

    /// Clear the running-tool label
    pub fn clear_tool_status(&mut self) {
        self.tool_status = None;
    }

    /// Append a sealed tool call
    pub fn push_tool_call(&mut self, record: ToolCallRecord) {
        self.tool_calls.push(record);
    }

    /// Freeze the message after a normal end of stream.
    ///
    /// An empty answer becomes [`FALLBACK_RESPONSE`].
    pub fn finalize(&mut self) {
        if !self.is_streaming() {
            return;
        }
        self.clear_tool_status();
        if self.content.is_empty() {
            self.content = FALLBACK_RESPONSE.to_string();
        }
        self.status = MessageStatus::Complete;
    }

    /// Freeze the message after the stream broke off.
    ///
    /// Content received so far is kept and the failure is appended.
    pub fn abort(&mut self, detail: &str) {
        if !self.is_streaming() {
            return;
        }
        self.clear_tool_status();
        self.status = if self.content.is_empty() && self.tool_calls.is_empty() {
            MessageStatus::Failed
        } else {
            MessageStatus::Incomplete
        };
        self.append_connection_error(detail);
    }
}
