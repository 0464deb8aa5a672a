//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`StreamTransport`] - opens the event stream for one query

pub mod transport;

pub use transport::{ByteStream, StreamTransport};
