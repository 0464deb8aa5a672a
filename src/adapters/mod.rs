//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`HttpTransport`] - stream transport using reqwest
//!
//! # Mock Implementations
//!
//! - [`mock::MockTransport`] - scripted chunk delivery for tests

pub mod mock;
pub mod reqwest_transport;

pub use mock::{MockStream, MockStreamSender, MockTransport};
pub use reqwest_transport::HttpTransport;
