//! Tool call correlation.
//!
//! The backend reports tool invocations as a `tool_start` frame followed
//! later by a `tool_end` frame carrying no ID. Calls are never concurrent,
//! so the correlator pairs each end with the single open start.

use tracing::warn;

use crate::models::{OpenToolCall, ToolCallRecord};

/// Single-slot state machine: `empty -> open -> empty`.
#[derive(Debug, Default)]
pub struct ToolCallCorrelator {
    open: Option<OpenToolCall>,
}

impl ToolCallCorrelator {
    /// Create an empty correlator
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a call.
    ///
    /// A start while a call is already open replaces it; the displaced call
    /// is returned unsealed.
    pub fn start(&mut self, tool: impl Into<String>, input: impl Into<String>) -> Option<OpenToolCall> {
        let displaced = self.open.replace(OpenToolCall::new(tool, input));
        if let Some(previous) = &displaced {
            warn!(
                "tool_start for '{}' while '{}' was still open; dropping the earlier call",
                self.open.as_ref().map(|c| c.tool.as_str()).unwrap_or_default(),
                previous.tool
            );
        }
        displaced
    }

    /// Seal the open call with its output.
    ///
    /// Returns `None` when no call is open.
    pub fn end(&mut self, output: impl Into<String>) -> Option<ToolCallRecord> {
        self.open.take().map(|call| call.seal(output))
    }

    /// The call currently awaiting its `tool_end`
    pub fn open_call(&self) -> Option<&OpenToolCall> {
        self.open.as_ref()
    }

    /// Whether a call is open
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Drop any open call, e.g. when the stream ends without its `tool_end`
    pub fn reset(&mut self) -> Option<OpenToolCall> {
        self.open.take()
    }
}
