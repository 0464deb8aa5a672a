//! Mock stream transport for testing.
//!
//! Each call to `open` takes the next scripted response from a queue, so a
//! test can describe a whole conversation up front. Responses can deliver
//! chunks all at once, fail before the stream opens, break off mid-stream,
//! or be fed by hand through a channel to hold a stream open.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::models::QueryRequest;
use crate::sse::StreamFrame;
use crate::traits::{ByteStream, StreamTransport};

/// One scripted response.
#[derive(Debug)]
pub enum MockStream {
    /// Deliver these chunks, then close
    Chunks(Vec<Bytes>),
    /// Deliver these chunks, then fail with a body error
    BreakAfter(Vec<Bytes>, TransportError),
    /// Fail before the stream opens
    Fail(TransportError),
    /// Deliver whatever the test sends through the paired sender; the
    /// stream closes when the sender is dropped
    Manual(mpsc::UnboundedReceiver<Result<Bytes, TransportError>>),
}

impl MockStream {
    /// Chunks holding the event lines for `frames`, one chunk per frame.
    pub fn frames(frames: &[StreamFrame]) -> Self {
        MockStream::Chunks(
            frames
                .iter()
                .map(|frame| Bytes::from(format!("{}\n\n", frame_line(frame))))
                .collect(),
        )
    }

    /// A manually fed stream and the sender that feeds it.
    pub fn manual() -> (Self, MockStreamSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        (MockStream::Manual(rx), MockStreamSender { tx })
    }
}

/// Feeds a [`MockStream::Manual`] response.
#[derive(Debug, Clone)]
pub struct MockStreamSender {
    tx: mpsc::UnboundedSender<Result<Bytes, TransportError>>,
}

impl MockStreamSender {
    /// Send raw bytes
    pub fn send_bytes(&self, bytes: impl Into<Bytes>) {
        let _ = self.tx.send(Ok(bytes.into()));
    }

    /// Send one frame as an event line
    pub fn send_frame(&self, frame: &StreamFrame) {
        self.send_bytes(format!("{}\n\n", frame_line(frame)));
    }

    /// Break the stream with a body error
    pub fn send_error(&self, error: TransportError) {
        let _ = self.tx.send(Err(error));
    }
}

fn frame_line(frame: &StreamFrame) -> String {
    frame
        .to_event_line()
        .unwrap_or_else(|e| format!("data: {{\"type\":\"error\",\"content\":\"{}\"}}", e))
}

/// Mock transport that records requests and replays scripted responses.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<MockStream>>>,
    requests: Arc<Mutex<Vec<QueryRequest>>>,
}

impl MockTransport {
    /// Create a mock with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next `open`
    pub fn push_response(&self, response: MockStream) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Every request seen so far, in order
    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StreamTransport for MockTransport {
    async fn open(&self, request: &QueryRequest) -> Result<ByteStream, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        let response = self.responses.lock().unwrap().pop_front();
        let body: ByteStream = match response {
            Some(MockStream::Chunks(chunks)) => {
                Box::pin(stream::iter(chunks.into_iter().map(Ok::<Bytes, TransportError>)))
            }
            Some(MockStream::BreakAfter(chunks, error)) => Box::pin(
                stream::iter(chunks.into_iter().map(Ok::<Bytes, TransportError>))
                    .chain(stream::once(async move { Err(error) })),
            ),
            Some(MockStream::Fail(error)) => return Err(error),
            Some(MockStream::Manual(rx)) => Box::pin(stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|item| (item, rx))
            })),
            None => {
                return Err(TransportError::Other {
                    message: "No mock response queued".to_string(),
                })
            }
        };
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_requests_in_order() {
        let transport = MockTransport::new();
        transport.push_response(MockStream::Chunks(vec![]));
        transport.push_response(MockStream::Chunks(vec![]));

        transport.open(&QueryRequest::new("one", None)).await.unwrap();
        transport.open(&QueryRequest::new("two", Some("s1"))).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].query, "one");
        assert_eq!(requests[1].session_id.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn test_frames_helper_produces_event_lines() {
        let transport = MockTransport::new();
        transport.push_response(MockStream::frames(&[StreamFrame::Done]));

        let chunks: Vec<_> = transport
            .open(&QueryRequest::new("q", None))
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].as_ref().unwrap(),
            &Bytes::from("data: {\"type\":\"done\"}\n\n")
        );
    }

    #[tokio::test]
    async fn test_fail_and_empty_queue() {
        let transport = MockTransport::new();
        transport.push_response(MockStream::Fail(TransportError::HttpStatus {
            status: 500,
            message: "boom".to_string(),
        }));

        let request = QueryRequest::new("q", None);
        assert!(matches!(
            transport.open(&request).await,
            Err(TransportError::HttpStatus { status: 500, .. })
        ));
        assert!(matches!(
            transport.open(&request).await,
            Err(TransportError::Other { .. })
        ));
    }

    #[tokio::test]
    async fn test_manual_stream_closes_when_sender_dropped() {
        let transport = MockTransport::new();
        let (response, sender) = MockStream::manual();
        transport.push_response(response);

        let mut body = transport.open(&QueryRequest::new("q", None)).await.unwrap();
        sender.send_bytes("data: x\n");
        drop(sender);

        assert_eq!(body.next().await.unwrap().unwrap(), Bytes::from("data: x\n"));
        assert!(body.next().await.is_none());
    }
}
