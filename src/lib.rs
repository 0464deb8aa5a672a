//! chatstream - a client for AI agents that answer over an event stream
//!
//! The engine turns the agent's byte stream into an ordered conversation:
//! lines are decoded across chunk boundaries, frames are dispatched to the
//! session, tool call and message state, and observers get a snapshot
//! after every change.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod models;
pub mod prelude;
pub mod sse;
pub mod state;
pub mod traits;
