//! One conversation and its streaming read loop.
//!
//! [`Conversation`] owns the message log, the session handle and the tool
//! call slot. A query moves it through `Idle -> Streaming -> Completed` or
//! `Errored`; every mutation publishes a fresh [`ConversationSnapshot`] on a
//! watch channel.

use std::sync::Arc;

use futures_util::StreamExt;
use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::dispatch::{dispatch_line, StateDelta};
use crate::error::{ConversationError, TransportError};
use crate::models::{Message, OpenToolCall, QueryRequest};
use crate::sse::decode_lines;
use crate::state::{ConversationState, SessionRegistry, ToolCallCorrelator};
use crate::traits::{ByteStream, StreamTransport};

/// Where the conversation is in its query lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamPhase {
    /// No query submitted yet
    Idle,
    /// A stream is open and frames are being applied
    Streaming,
    /// The last stream closed normally
    Completed,
    /// The last stream failed or was cancelled
    Errored,
}

impl StreamPhase {
    /// Whether a new query may be submitted.
    pub fn accepts_submit(&self) -> bool {
        !matches!(self, StreamPhase::Streaming)
    }
}

/// Read-only copy of conversation state handed to observers.
///
/// Messages are shared with the conversation, so taking a snapshot costs one
/// reference count per message rather than a copy of the history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSnapshot {
    pub conversation_id: Uuid,
    pub messages: Vec<Arc<Message>>,
    pub session_id: Option<String>,
    pub phase: StreamPhase,
    /// The agent sent `done` during the current or last stream
    pub done: bool,
    /// Bumped on every published mutation
    pub revision: u64,
}

impl ConversationSnapshot {
    /// The most recent message, usually the assistant answer being built
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last().map(Arc::as_ref)
    }
}

/// How a stream ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutcome {
    /// Transport closed normally
    Completed,
    /// Transport failed before or during the stream
    Failed(TransportError),
    /// The owner cancelled the read loop
    Cancelled,
}

/// A single conversation with the agent.
#[derive(Debug)]
pub struct Conversation {
    id: Uuid,
    state: ConversationState,
    session: SessionRegistry,
    tools: ToolCallCorrelator,
    phase: StreamPhase,
    done_received: bool,
    revision: u64,
    snapshot_tx: watch::Sender<ConversationSnapshot>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        let (snapshot_tx, _) = watch::channel(ConversationSnapshot {
            conversation_id: id,
            messages: Vec::new(),
            session_id: None,
            phase: StreamPhase::Idle,
            done: false,
            revision: 0,
        });

        Self {
            id,
            state: ConversationState::new(),
            session: SessionRegistry::new(),
            tools: ToolCallCorrelator::new(),
            phase: StreamPhase::Idle,
            done_received: false,
            revision: 0,
            snapshot_tx,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    pub fn messages(&self) -> &[Arc<Message>] {
        self.state.messages()
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.current()
    }

    /// The tool call that has started but not yet ended
    pub fn open_tool_call(&self) -> Option<&OpenToolCall> {
        self.tools.open_call()
    }

    /// Whether the agent has sent `done` for the current or last stream
    pub fn is_done(&self) -> bool {
        self.done_received
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Observe every published mutation.
    pub fn subscribe(&self) -> watch::Receiver<ConversationSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Build a snapshot of the current state.
    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            conversation_id: self.id,
            messages: self.state.messages().to_vec(),
            session_id: self.session.current().map(str::to_string),
            phase: self.phase,
            done: self.done_received,
            revision: self.revision,
        }
    }

    /// Start a query: record the user message and the assistant placeholder
    /// and return the request to send.
    ///
    /// Nothing changes if the query is rejected.
    pub fn begin(&mut self, query: &str) -> Result<QueryRequest, ConversationError> {
        if !self.phase.accepts_submit() {
            warn!("Rejecting query: a stream is already in progress");
            return Err(ConversationError::StreamInProgress);
        }
        if query.trim().is_empty() {
            return Err(ConversationError::EmptyQuery);
        }

        let request = QueryRequest::new(query, self.session.current());

        if let Some(dropped) = self.tools.reset() {
            warn!("Dropping unfinished tool call '{}'", dropped.tool);
        }
        self.done_received = false;
        self.state.push_user(query);
        self.state.push_assistant_placeholder();
        self.phase = StreamPhase::Streaming;
        self.notify();

        info!(
            "Query submitted (conversation: {}, session: {})",
            self.id,
            self.session.current().unwrap_or("none")
        );
        Ok(request)
    }

    /// Decode and apply one event line.
    pub fn apply_line(&mut self, line: &str) {
        if let Some(delta) = dispatch_line(line) {
            self.apply(delta);
        }
    }

    /// Apply one state delta and notify observers.
    ///
    /// Deltas outside a stream are ignored.
    pub fn apply(&mut self, delta: StateDelta) {
        if self.phase != StreamPhase::Streaming {
            debug!("Ignoring {:?} outside an active stream", delta);
            return;
        }

        let active = self.state.active_assistant_mut();
        match delta {
            StateDelta::SessionStarted(session_id) => {
                self.session.set(session_id);
            }
            StateDelta::TokenAppended(content) => {
                if let Some(message) = active {
                    message.append_token(&content);
                }
            }
            StateDelta::ToolStarted { tool, input } => {
                if let Some(message) = active {
                    message.set_tool_status(&tool);
                }
                self.tools.start(tool, input);
            }
            StateDelta::ToolEnded { output } => {
                let record = self.tools.end(output);
                if let Some(message) = active {
                    message.clear_tool_status();
                    if let Some(record) = record {
                        message.push_tool_call(record);
                    }
                }
            }
            StateDelta::ErrorReported(content) => {
                warn!("Agent reported an error: {}", content);
                if let Some(message) = active {
                    message.append_error(&content);
                }
            }
            StateDelta::StreamDone => {
                if let Some(message) = active {
                    message.clear_tool_status();
                }
                self.done_received = true;
                info!("Agent finished responding");
            }
        }

        self.notify();
    }

    /// Close the stream normally.
    pub fn complete(&mut self) {
        if self.phase != StreamPhase::Streaming {
            return;
        }
        if let Some(dropped) = self.tools.reset() {
            warn!("Stream closed with tool call '{}' still open", dropped.tool);
        }
        if !self.done_received {
            debug!("Stream closed without a done frame");
        }
        if let Some(message) = self.state.active_assistant_mut() {
            message.finalize();
        }
        self.phase = StreamPhase::Completed;
        self.notify();
        info!("Stream completed ({} messages)", self.state.len());
    }

    /// Close the stream after a transport failure or cancellation.
    pub fn fail(&mut self, err: &TransportError) {
        if self.phase != StreamPhase::Streaming {
            return;
        }
        match err {
            TransportError::Cancelled => info!("Stream cancelled"),
            _ => error!("Stream failed [{}]: {}", err.error_code(), err),
        }
        self.tools.reset();
        if let Some(message) = self.state.active_assistant_mut() {
            message.abort(&err.user_message());
        }
        self.phase = StreamPhase::Errored;
        self.notify();
    }

    /// Submit a query and read its stream to the end.
    ///
    /// Rejections come back as `Err`; transport failures are part of the
    /// conversation and come back as a [`StreamOutcome`].
    pub async fn submit<T>(
        &mut self,
        transport: &T,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<StreamOutcome, ConversationError>
    where
        T: StreamTransport + ?Sized,
    {
        let request = self.begin(query)?;
        Ok(self.drive(transport, request, cancel).await)
    }

    /// Open the stream for an already begun query and apply every frame.
    pub async fn drive<T>(
        &mut self,
        transport: &T,
        request: QueryRequest,
        cancel: &CancellationToken,
    ) -> StreamOutcome
    where
        T: StreamTransport + ?Sized,
    {
        let opened: Result<ByteStream, TransportError> = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            result = transport.open(&request) => result,
        };

        let bytes = match opened {
            Ok(bytes) => bytes,
            Err(err) => return self.finish_with_error(err),
        };
        info!("Stream connected");

        let mut lines = decode_lines(bytes);
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => Some(Err(TransportError::Cancelled)),
                line = lines.next() => line,
            };

            match next {
                Some(Ok(line)) => self.apply_line(&line),
                Some(Err(err)) => return self.finish_with_error(err),
                None => break,
            }
        }

        self.complete();
        StreamOutcome::Completed
    }

    fn finish_with_error(&mut self, err: TransportError) -> StreamOutcome {
        self.fail(&err);
        match err {
            TransportError::Cancelled => StreamOutcome::Cancelled,
            other => StreamOutcome::Failed(other),
        }
    }

    fn notify(&mut self) {
        self.revision += 1;
        self.snapshot_tx.send_replace(self.snapshot());
    }
}
