//! Byte-level line reassembly for the event stream.
//!
//! The response body arrives as arbitrary byte chunks. A chunk boundary can
//! fall anywhere: in the middle of a JSON payload, between `\r` and `\n`,
//! or inside a multi-byte UTF-8 character. `FrameDecoder` buffers bytes,
//! not text, and only decodes a line once its terminating `\n` has
//! arrived. `\n` never occurs inside a multi-byte UTF-8 sequence, so a
//! split character always stays whole in the carried-over tail.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::pin::Pin;

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;
use tracing::{trace, warn};

use crate::error::TransportError;
use crate::sse::parser::is_data_line;
use crate::traits::ByteStream;

/// Lazy stream of complete event lines.
pub type LineStream = Pin<Box<dyn Stream<Item = Result<String, TransportError>> + Send>>;

/// Stateful decoder that turns byte chunks into complete event lines.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Bytes after the last newline seen so far; never contains `\n`
    pending: Vec<u8>,
}

impl FrameDecoder {
    /// Create a new decoder with an empty carry-over buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and collect every event line it completes.
    ///
    /// Lines that are not event lines (blank separators, `event:` lines,
    /// `:` comments) are dropped here.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        // `pending` held no newline before this chunk, so only the chunk is searched.
        let carried = self.pending.len();
        self.pending.extend_from_slice(chunk);

        let Some(offset) = chunk.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };
        let last_newline = carried + offset;

        let tail = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, tail);

        complete[..last_newline]
            .split(|b| *b == b'\n')
            .filter_map(decode_line)
            .collect()
    }

    /// Flush the unterminated tail once the transport has closed.
    pub fn finish(&mut self) -> Option<String> {
        let tail = std::mem::take(&mut self.pending);
        if tail.is_empty() {
            return None;
        }
        decode_line(&tail)
    }

    /// Number of bytes waiting for a newline
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Decode one raw line, keeping it only if it is an event line.
fn decode_line(raw: &[u8]) -> Option<String> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);

    let text = match std::str::from_utf8(raw) {
        Ok(text) => Cow::Borrowed(text),
        Err(e) => {
            warn!("Event line is not valid UTF-8 ({}), decoding lossily", e);
            String::from_utf8_lossy(raw)
        }
    };

    if is_data_line(&text) {
        Some(text.into_owned())
    } else {
        if !text.is_empty() {
            trace!("Discarding non-event line: {}", text);
        }
        None
    }
}

/// Adapt a response body into a lazy stream of complete event lines.
///
/// A body error is yielded once and ends the stream. When the body ends
/// normally any unterminated final line is flushed.
pub fn decode_lines(bytes: ByteStream) -> LineStream {
    let lines = stream::unfold(
        (bytes, FrameDecoder::new(), VecDeque::new(), false),
        |(mut bytes, mut decoder, mut ready, mut finished)| async move {
            loop {
                if let Some(line) = ready.pop_front() {
                    return Some((Ok(line), (bytes, decoder, ready, finished)));
                }
                if finished {
                    return None;
                }

                match bytes.next().await {
                    Some(Ok(chunk)) => ready.extend(decoder.push(&chunk)),
                    Some(Err(e)) => {
                        finished = true;
                        return Some((Err(e), (bytes, decoder, ready, finished)));
                    }
                    None => {
                        finished = true;
                        ready.extend(decoder.finish());
                    }
                }
            }
        },
    );

    Box::pin(lines)
}
