//! State owned by one conversation.
//!
//! - `conversation` - the append-only message log observers read
//! - `session` - the server-issued session ID
//! - `tools` - the single open tool call awaiting its end frame
//!
//! All three are mutated only from the dispatch path of
//! [`Conversation`](crate::conversation::Conversation).

mod conversation;
mod session;
mod tools;

pub use conversation::ConversationState;
pub use session::SessionRegistry;
pub use tools::ToolCallCorrelator;
