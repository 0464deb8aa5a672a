//! CLI module for chatstream.
//!
//! This module provides the command-line front end:
//! - Argument parsing
//! - Version and usage display
//! - Incremental printing of a streaming answer
//!
//! # Usage
//!
//! ```ignore
//! use chatstream::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args()) {
//!     CliCommand::Chat(options) => { /* start a conversation */ }
//!     other => { /* version, help, or a usage error */ }
//! }
//! ```

pub mod args;
pub mod output;
pub mod version;

pub use args::{parse_args, ChatOptions, CliCommand};
pub use output::StreamPrinter;
pub use version::{version_line, VERSION};

/// Usage text for `--help`.
pub const HELP: &str = "\
Usage: chatstream [OPTIONS]

Chat with a streaming agent backend from the terminal.

Options:
  --url <URL>      Agent backend origin (default: $CHATSTREAM_URL or http://localhost:8000)
  --once <QUERY>   Ask a single question, print the answer and exit
  -h, --help       Show this help
  -V, --version    Show version

Environment:
  CHATSTREAM_URL            Agent backend origin
  CHATSTREAM_STREAM_PATH    Streaming endpoint path (default: /api/query/stream)
  CHATSTREAM_TIMEOUT_SECS   Overall request timeout in seconds
  CHATSTREAM_LOG            Log filter, e.g. chatstream=debug (logs go to stderr)

Press Ctrl-C to cancel an answer while it streams.
";
