//! Common test utilities for integration tests.
//!
//! Builders for event-stream bodies and a transport pointed at a
//! wiremock server.
//!
//! # Example
//!
//! ```ignore
//! let body = event_body(&[json!({"type": "token", "content": "Hi"}), done()]);
//! Mock::given(method("POST")).respond_with(event_stream(body)).mount(&server).await;
//! ```

#![allow(dead_code)]

use chatstream::adapters::HttpTransport;
use chatstream::config::ClientConfig;
use serde_json::{json, Value};
use wiremock::{MockServer, ResponseTemplate};

pub const STREAM_PATH: &str = "/api/query/stream";

/// Join frames into an event-stream body, one `data:` line per frame.
pub fn event_body(frames: &[Value]) -> String {
    frames
        .iter()
        .map(|frame| format!("data: {}\n\n", frame))
        .collect()
}

/// A 200 response carrying `body` as an event stream.
pub fn event_stream(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(body.into())
}

pub fn session(id: &str) -> Value {
    json!({"type": "session", "session_id": id})
}

pub fn token(content: &str) -> Value {
    json!({"type": "token", "content": content})
}

pub fn tool_start(tool: &str, input: &str) -> Value {
    json!({"type": "tool_start", "tool": tool, "input": input})
}

pub fn tool_end(output: &str) -> Value {
    json!({"type": "tool_end", "output": output})
}

pub fn error(content: &str) -> Value {
    json!({"type": "error", "content": content})
}

pub fn done() -> Value {
    json!({"type": "done"})
}

/// A transport streaming from `server`.
pub fn transport_for(server: &MockServer) -> HttpTransport {
    let config = ClientConfig::default()
        .with_base_url(server.uri())
        .with_stream_path(STREAM_PATH);
    HttpTransport::new(&config).expect("valid test config")
}

/// JSON bodies of every request the server received, in order.
pub async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| serde_json::from_slice(&request.body).expect("JSON request body"))
        .collect()
}
