use serde::{Deserialize, Serialize};

/// A tool invocation that has started but not finished.
///
/// Only the correlator holds one of these. Sealing consumes it, so an open
/// call can never end up in a message's `tool_calls`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenToolCall {
    /// Name of the tool (e.g. "run_cypher", "calculate_formula")
    pub tool: String,
    /// Raw input text as sent by the backend
    pub input: String,
}

impl OpenToolCall {
    /// Create a new open call
    pub fn new(tool: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            input: input.into(),
        }
    }

    /// Attach the output and seal the call
    pub fn seal(self, output: impl Into<String>) -> ToolCallRecord {
        ToolCallRecord {
            tool: self.tool,
            input: self.input,
            output: output.into(),
        }
    }
}

/// A finished tool invocation, shown under the assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Name of the tool
    pub tool: String,
    /// Raw input text
    pub input: String,
    /// Raw output text
    pub output: String,
}

impl ToolCallRecord {
    /// Output preview cut at a char boundary, for one-line summaries
    pub fn output_preview(&self, max_chars: usize) -> String {
        let mut chars = self.output.chars();
        let preview: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}...", preview)
        } else {
            preview
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_keeps_pairing() {
        let record = OpenToolCall::new("calc", "2+2").seal("4");
        assert_eq!(
            record,
            ToolCallRecord {
                tool: "calc".to_string(),
                input: "2+2".to_string(),
                output: "4".to_string(),
            }
        );
    }

    #[test]
    fn test_output_preview() {
        let record = OpenToolCall::new("search", "").seal("사고발생률 정의");
        assert_eq!(record.output_preview(5), "사고발생률...");
        assert_eq!(record.output_preview(100), "사고발생률 정의");
    }
}
