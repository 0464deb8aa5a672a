//! Stream transport trait abstraction.
//!
//! The conversation only needs one capability from the network: send a
//! query and get back the response body as a lazy sequence of byte chunks.
//! Abstracting it lets tests script chunk boundaries exactly.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

use crate::error::TransportError;
use crate::models::QueryRequest;

/// Response body of one streamed query, chunk by chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Opens the event stream for one query.
///
/// # Example
///
/// ```ignore
/// use chatstream::traits::StreamTransport;
/// use chatstream::models::QueryRequest;
///
/// async fn open<T: StreamTransport>(transport: &T) {
///     let request = QueryRequest::new("사고발생률이 뭐야?", None);
///     let body = transport.open(&request).await?;
///     // feed `body` to chatstream::sse::decode_lines
/// }
/// ```
#[async_trait]
pub trait StreamTransport: Send + Sync {
    /// Send the query and return the body once a success status arrived.
    ///
    /// A non-success status must be reported as
    /// [`TransportError::HttpStatus`], not as an empty body.
    async fn open(&self, request: &QueryRequest) -> Result<ByteStream, TransportError>;
}
