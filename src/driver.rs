//! Conversation actor.
//!
//! [`ConversationHandle`] spawns one task that owns a [`Conversation`].
//! Callers talk to it over a command channel and observe it through the
//! snapshot watch channel, so state is never shared behind a lock.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::conversation::{Conversation, ConversationSnapshot, StreamPhase};
use crate::error::ConversationError;
use crate::traits::StreamTransport;

const COMMAND_BUFFER: usize = 16;

enum Command {
    Submit {
        query: String,
        reply: oneshot::Sender<Result<(), ConversationError>>,
    },
    CancelStream,
}

/// Handle to a conversation running on its own task.
///
/// Dropping the handle cancels any stream in flight and stops the task.
///
/// # Example
///
/// ```ignore
/// let handle = ConversationHandle::spawn(Arc::new(HttpTransport::new(&config)?));
/// handle.submit("What is a net premium?").await?;
/// let snapshot = handle.wait_idle().await?;
/// println!("{}", snapshot.last_message().map(|m| m.content.as_str()).unwrap_or(""));
/// ```
pub struct ConversationHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<ConversationSnapshot>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ConversationHandle {
    /// Spawn a fresh conversation on the current runtime.
    pub fn spawn(transport: Arc<dyn StreamTransport>) -> Self {
        Self::spawn_with(Conversation::new(), transport)
    }

    /// Spawn an existing conversation on the current runtime.
    pub fn spawn_with(conversation: Conversation, transport: Arc<dyn StreamTransport>) -> Self {
        let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
        let snapshots = conversation.subscribe();
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run(conversation, transport, rx, cancel.clone()));

        Self {
            commands,
            snapshots,
            cancel,
            task: Some(task),
        }
    }

    /// Submit a query.
    ///
    /// Returns once the query has been accepted and the stream is starting,
    /// or with the reason it was rejected. Use [`wait_idle`](Self::wait_idle)
    /// or [`subscribe`](Self::subscribe) to follow the answer.
    pub async fn submit(&self, query: impl Into<String>) -> Result<(), ConversationError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Submit {
                query: query.into(),
                reply,
            })
            .await
            .map_err(|_| ConversationError::Closed)?;

        response.await.map_err(|_| ConversationError::Closed)?
    }

    /// Cancel the stream in flight, if any. The conversation stays usable.
    pub async fn cancel_stream(&self) -> Result<(), ConversationError> {
        self.commands
            .send(Command::CancelStream)
            .await
            .map_err(|_| ConversationError::Closed)
    }

    /// Observe every published mutation.
    pub fn subscribe(&self) -> watch::Receiver<ConversationSnapshot> {
        self.snapshots.clone()
    }

    /// The latest published state.
    pub fn snapshot(&self) -> ConversationSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait until no stream is in flight and return that state.
    pub async fn wait_idle(&self) -> Result<ConversationSnapshot, ConversationError> {
        let mut rx = self.snapshots.clone();
        let snapshot = rx
            .wait_for(|s| s.phase != StreamPhase::Streaming)
            .await
            .map_err(|_| ConversationError::Closed)?;
        Ok(snapshot.clone())
    }

    /// Cancel everything and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Conversation task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for ConversationHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    mut conversation: Conversation,
    transport: Arc<dyn StreamTransport>,
    mut commands: mpsc::Receiver<Command>,
    cancel: CancellationToken,
) {
    debug!("Conversation {} started", conversation.id());

    loop {
        let command = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            command = commands.recv() => match command {
                Some(command) => command,
                None => break,
            },
        };

        match command {
            Command::Submit { query, reply } => {
                let request = match conversation.begin(&query) {
                    Ok(request) => {
                        let _ = reply.send(Ok(()));
                        request
                    }
                    Err(e) => {
                        let _ = reply.send(Err(e));
                        continue;
                    }
                };

                let stream_cancel = cancel.child_token();
                let outcome = reject_while(
                    conversation.drive(transport.as_ref(), request, &stream_cancel),
                    &mut commands,
                    &stream_cancel,
                )
                .await;
                debug!("Stream ended: {:?}", outcome);
            }
            Command::CancelStream => debug!("No stream to cancel"),
        }
    }

    debug!("Conversation {} stopped", conversation.id());
}

/// Run `stream` to completion while answering commands that arrive in the
/// meantime: submissions are rejected, cancellation is forwarded.
async fn reject_while<F>(
    stream: F,
    commands: &mut mpsc::Receiver<Command>,
    stream_cancel: &CancellationToken,
) -> F::Output
where
    F: Future,
{
    tokio::pin!(stream);
    loop {
        tokio::select! {
            output = &mut stream => return output,
            Some(command) = commands.recv() => match command {
                Command::Submit { reply, .. } => {
                    warn!("Rejecting query: a stream is already in progress");
                    let _ = reply.send(Err(ConversationError::StreamInProgress));
                }
                Command::CancelStream => stream_cancel.cancel(),
            },
        }
    }
}
