//! Mock implementations for testing.
//!
//! - [`MockTransport`] - stream transport with scripted responses

pub mod transport;

pub use transport::{MockStream, MockStreamSender, MockTransport};
