//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```ignore
//! use chatstream::prelude::*;
//! ```
//!
//! This will import:
//! - Conversation types (Conversation, ConversationHandle, snapshots)
//! - Model types (Message, MessageRole, MessageStatus, ToolCallRecord)
//! - Transport trait and implementations
//! - Configuration and error types

// Conversation
pub use crate::conversation::{Conversation, ConversationSnapshot, StreamOutcome, StreamPhase};
pub use crate::driver::ConversationHandle;

// Model types
pub use crate::models::{Message, MessageRole, MessageStatus, QueryRequest, ToolCallRecord};

// Transport
pub use crate::adapters::HttpTransport;
pub use crate::traits::StreamTransport;

// Configuration and errors
pub use crate::config::ClientConfig;
pub use crate::error::{ChatError, ChatResult, ConversationError, TransportError};
