//! Conversation data types.

mod message;
mod request;
mod tools;

pub use message::{Message, MessageRole, MessageStatus, FALLBACK_RESPONSE};
pub use request::QueryRequest;
pub use tools::{OpenToolCall, ToolCallRecord};
