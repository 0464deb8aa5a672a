//! Stream frame types and definitions
//!
//! Contains the StreamFrame enum with every event the agent backend emits
//! while answering one query.

use serde::{Deserialize, Deserializer, Serialize};

/// Typed frames from the agent event stream.
///
/// Each event line carries a JSON object whose `type` field selects the
/// variant. Types this client does not know deserialize to `Unknown` and
/// are ignored by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamFrame {
    /// Server-issued session identifier for this conversation
    Session { session_id: String },
    /// Incremental fragment of assistant text
    Token { content: String },
    /// A tool invocation started
    ToolStart {
        tool: String,
        #[serde(default, deserialize_with = "raw_text")]
        input: String,
    },
    /// The open tool invocation finished
    ToolEnd {
        #[serde(default, deserialize_with = "raw_text")]
        output: String,
    },
    /// Application error reported inside the stream
    Error {
        #[serde(alias = "message")]
        content: String,
    },
    /// The agent finished answering
    Done,
    /// Any type this client does not handle
    #[serde(other)]
    Unknown,
}

impl StreamFrame {
    /// Returns the event type name as a string for debugging purposes.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            StreamFrame::Session { .. } => "session",
            StreamFrame::Token { .. } => "token",
            StreamFrame::ToolStart { .. } => "tool_start",
            StreamFrame::ToolEnd { .. } => "tool_end",
            StreamFrame::Error { .. } => "error",
            StreamFrame::Done => "done",
            StreamFrame::Unknown => "unknown",
        }
    }

    /// Render this frame as one event line, without the trailing newline.
    pub fn to_event_line(&self) -> Result<String, serde_json::Error> {
        Ok(format!("data: {}", serde_json::to_string(self)?))
    }
}

/// Tool input/output may arrive as a JSON string or as any other JSON
/// value; non-strings are kept as their JSON text.
fn raw_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(text)) => text,
        Some(other) => other.to_string(),
    })
}

/// Errors that can occur while parsing one event line
#[derive(Debug, Clone, PartialEq)]
pub enum FrameParseError {
    /// Line does not start with `data:`
    NotADataLine,
    /// Payload is not valid JSON
    InvalidJson { source: String },
    /// Payload is JSON but has no string `type` field
    MissingType,
    /// Payload has a known type but its fields do not match
    InvalidPayload { event_type: String, source: String },
}

impl std::fmt::Display for FrameParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameParseError::NotADataLine => write!(f, "Line is not a data line"),
            FrameParseError::InvalidJson { source } => {
                write!(f, "Invalid JSON in event line: {}", source)
            }
            FrameParseError::MissingType => write!(f, "Event payload has no type field"),
            FrameParseError::InvalidPayload { event_type, source } => {
                write!(f, "Invalid payload for event '{}': {}", event_type, source)
            }
        }
    }
}

impl std::error::Error for FrameParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_name() {
        assert_eq!(StreamFrame::Done.event_type_name(), "done");
        assert_eq!(
            StreamFrame::Token {
                content: String::new()
            }
            .event_type_name(),
            "token"
        );
        assert_eq!(
            StreamFrame::ToolEnd {
                output: String::new()
            }
            .event_type_name(),
            "tool_end"
        );
    }

    #[test]
    fn test_deserialize_tool_start_without_input() {
        let frame: StreamFrame =
            serde_json::from_str(r#"{"type":"tool_start","tool":"run_cypher"}"#).unwrap();
        assert_eq!(
            frame,
            StreamFrame::ToolStart {
                tool: "run_cypher".to_string(),
                input: String::new(),
            }
        );
    }

    #[test]
    fn test_deserialize_structured_tool_input_kept_as_json_text() {
        let frame: StreamFrame = serde_json::from_str(
            r#"{"type":"tool_start","tool":"calculate_formula","input":{"I":100,"N":1000}}"#,
        )
        .unwrap();
        match frame {
            StreamFrame::ToolStart { tool, input } => {
                assert_eq!(tool, "calculate_formula");
                let parsed: serde_json::Value = serde_json::from_str(&input).unwrap();
                assert_eq!(parsed["I"], 100);
            }
            other => panic!("Expected ToolStart, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_tool_end_null_output() {
        let frame: StreamFrame =
            serde_json::from_str(r#"{"type":"tool_end","output":null}"#).unwrap();
        assert_eq!(
            frame,
            StreamFrame::ToolEnd {
                output: String::new()
            }
        );
    }

    #[test]
    fn test_error_accepts_message_alias() {
        let frame: StreamFrame =
            serde_json::from_str(r#"{"type":"error","message":"neo4j unavailable"}"#).unwrap();
        assert_eq!(
            frame,
            StreamFrame::Error {
                content: "neo4j unavailable".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_type() {
        let frame: StreamFrame =
            serde_json::from_str(r#"{"type":"graph_update","nodes":[]}"#).unwrap();
        assert_eq!(frame, StreamFrame::Unknown);
    }

    #[test]
    fn test_to_event_line() {
        let line = StreamFrame::Session {
            session_id: "s1".to_string(),
        }
        .to_event_line()
        .unwrap();
        assert_eq!(line, r#"data: {"type":"session","session_id":"s1"}"#);
        assert_eq!(
            StreamFrame::Done.to_event_line().unwrap(),
            r#"data: {"type":"done"}"#
        );
    }

    #[test]
    fn test_frame_parse_error_display() {
        let err = FrameParseError::InvalidPayload {
            event_type: "token".to_string(),
            source: "missing field `content`".to_string(),
        };
        assert!(err.to_string().contains("token"));
        assert_eq!(
            FrameParseError::MissingType.to_string(),
            "Event payload has no type field"
        );
    }
}
