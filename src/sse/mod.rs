//! Agent event stream decoding and parsing
//!
//! The backend answers a query with a newline-delimited stream of
//! `data: <json>` lines, each JSON object tagged by a `type` field.
//!
//! # Module structure
//! - `decoder` - byte chunk reassembly into complete lines (FrameDecoder)
//! - `events` - frame type definitions (StreamFrame, FrameParseError)
//! - `parser` - line to frame parsing (parse_frame)

mod decoder;
mod events;
mod parser;

pub use decoder::{decode_lines, FrameDecoder, LineStream};
pub use events::{FrameParseError, StreamFrame};
pub use parser::{is_data_line, parse_frame, strip_data_prefix, DATA_PREFIX};
