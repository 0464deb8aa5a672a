//! Event line parsing
//!
//! Turns one decoded `data: <json>` line into a typed [`StreamFrame`].

use crate::sse::events::{FrameParseError, StreamFrame};

/// Prefix every event line carries.
pub const DATA_PREFIX: &str = "data:";

/// Whether a decoded line is an event line.
pub fn is_data_line(line: &str) -> bool {
    line.starts_with(DATA_PREFIX)
}

/// Strip the `data:` prefix and the single optional space after it.
pub fn strip_data_prefix(line: &str) -> Option<&str> {
    line.strip_prefix(DATA_PREFIX)
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
}

/// Parse one event line into a typed frame.
///
/// Returns:
/// - `Ok(frame)` - a frame, possibly `StreamFrame::Unknown` for types this
///   client does not handle
/// - `Err(error)` - the line is not an event line or its payload is bad
pub fn parse_frame(line: &str) -> Result<StreamFrame, FrameParseError> {
    let payload = strip_data_prefix(line).ok_or(FrameParseError::NotADataLine)?;

    let value: serde_json::Value =
        serde_json::from_str(payload.trim()).map_err(|e| FrameParseError::InvalidJson {
            source: e.to_string(),
        })?;

    let event_type = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or(FrameParseError::MissingType)?
        .to_string();

    serde_json::from_value(value).map_err(|e| FrameParseError::InvalidPayload {
        event_type,
        source: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_data_prefix() {
        assert_eq!(strip_data_prefix("data: {}"), Some("{}"));
        assert_eq!(strip_data_prefix("data:{}"), Some("{}"));
        assert_eq!(strip_data_prefix("data:  {}"), Some(" {}"));
        assert_eq!(strip_data_prefix("event: token"), None);
        assert_eq!(strip_data_prefix(""), None);
    }

    #[test]
    fn test_parse_session_frame() {
        let frame = parse_frame(r#"data: {"type":"session","session_id":"s1"}"#).unwrap();
        assert_eq!(
            frame,
            StreamFrame::Session {
                session_id: "s1".to_string()
            }
        );
    }

    #[test]
    fn test_parse_token_frame_without_space() {
        let frame = parse_frame(r#"data:{"type":"token","content":"순보험료"}"#).unwrap();
        assert_eq!(
            frame,
            StreamFrame::Token {
                content: "순보험료".to_string()
            }
        );
    }

    #[test]
    fn test_parse_done_with_extra_fields() {
        let frame = parse_frame(r#"data: {"type":"done","elapsed_ms":1234}"#).unwrap();
        assert_eq!(frame, StreamFrame::Done);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_frame("data: {not json");
        assert!(matches!(result, Err(FrameParseError::InvalidJson { .. })));
    }

    #[test]
    fn test_parse_missing_type() {
        let result = parse_frame(r#"data: {"content":"orphan"}"#);
        assert_eq!(result, Err(FrameParseError::MissingType));

        let result = parse_frame(r#"data: ["token"]"#);
        assert_eq!(result, Err(FrameParseError::MissingType));
    }

    #[test]
    fn test_parse_known_type_with_bad_fields() {
        let result = parse_frame(r#"data: {"type":"token"}"#);
        match result {
            Err(FrameParseError::InvalidPayload { event_type, .. }) => {
                assert_eq!(event_type, "token")
            }
            other => panic!("Expected InvalidPayload, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_not_a_data_line() {
        assert_eq!(
            parse_frame(": keep-alive"),
            Err(FrameParseError::NotADataLine)
        );
    }

    #[test]
    fn test_parse_unknown_type_is_not_an_error() {
        let frame = parse_frame(r#"data: {"type":"heartbeat"}"#).unwrap();
        assert_eq!(frame, StreamFrame::Unknown);
    }
}
