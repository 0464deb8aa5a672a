//! Event dispatch: decoded line -> typed frame -> state delta.
//!
//! Reduction is pure. [`reduce`] says what a frame means for the
//! conversation; [`Conversation::apply`](crate::conversation::Conversation::apply)
//! performs the mutation and notifies observers.

use tracing::{debug, warn};

use crate::sse::{parse_frame, StreamFrame};

/// The effect one frame has on conversation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateDelta {
    /// Record the server-issued session ID
    SessionStarted(String),
    /// Append text to the active assistant message
    TokenAppended(String),
    /// Show the tool as running and open a call
    ToolStarted { tool: String, input: String },
    /// Clear the running tool and seal the open call, if any
    ToolEnded { output: String },
    /// Append an inline error to the active assistant message
    ErrorReported(String),
    /// The agent finished; the transport may still deliver trailing bytes
    StreamDone,
}

/// Map a frame to its state delta. Unknown frames have no effect.
pub fn reduce(frame: StreamFrame) -> Option<StateDelta> {
    match frame {
        StreamFrame::Session { session_id } => Some(StateDelta::SessionStarted(session_id)),
        StreamFrame::Token { content } => Some(StateDelta::TokenAppended(content)),
        StreamFrame::ToolStart { tool, input } => Some(StateDelta::ToolStarted { tool, input }),
        StreamFrame::ToolEnd { output } => Some(StateDelta::ToolEnded { output }),
        StreamFrame::Error { content } => Some(StateDelta::ErrorReported(content)),
        StreamFrame::Done => Some(StateDelta::StreamDone),
        StreamFrame::Unknown => None,
    }
}

/// Parse and reduce one decoded line.
///
/// A malformed line is logged and skipped; it never ends the stream.
pub fn dispatch_line(line: &str) -> Option<StateDelta> {
    match parse_frame(line) {
        Ok(frame) => {
            debug!("Frame: {}", frame.event_type_name());
            reduce(frame)
        }
        Err(e) => {
            warn!("Skipping malformed frame: {} (line: {})", e, truncate_for_log(line));
            None
        }
    }
}

fn truncate_for_log(line: &str) -> &str {
    const MAX_LOG_CHARS: usize = 120;
    match line.char_indices().nth(MAX_LOG_CHARS) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}
