//! Error handling for the streaming conversation client.
//!
//! - **Error Categories**: high-level classification for handling decisions
//! - **Domain-specific Errors**: transport and conversation errors
//! - **Unified Error Type**: `ChatError` consolidates all error types
//! - **Result Type Alias**: `ChatResult<T>`
//!
//! Malformed frames never surface here: the read loop logs and drops them.
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, timeout, lost body | Yes |
//! | Server | Non-2xx from the agent backend | Yes |
//! | User | Empty query, query while streaming | No |
//! | Configuration | Bad URL or timeout settings | No |

mod category;
mod chat_error;
mod conversation;
mod result;
mod transport;

pub use category::ErrorCategory;
pub use chat_error::ChatError;
pub use conversation::ConversationError;
pub use result::ChatResult;
pub use transport::{classify_reqwest_error, TransportError};
