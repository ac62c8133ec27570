//! Advisory progress events pushed by nodes while a workflow runs.
//!
//! Emission must never block or fail a node: the sink wraps a bounded
//! channel and drops events when the consumer is gone or falls behind.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// Event classification understood by streaming consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Advisory note about reasoning/tool progress.
    Reasoning,
    /// Incremental fragment of the final answer.
    Chunk,
    /// End of stream.
    End,
    /// Terminal failure.
    Error,
}

impl EventKind {
    /// Terminal kinds mark end-of-stream for consumers.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventKind::End | EventKind::Error)
    }
}

/// One event frame relayed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub data: String,
}

impl ProgressEvent {
    pub fn new(kind: EventKind, data: impl Into<String>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }

    pub fn reasoning(data: impl Into<String>) -> Self {
        Self::new(EventKind::Reasoning, data)
    }

    pub fn chunk(data: impl Into<String>) -> Self {
        Self::new(EventKind::Chunk, data)
    }

    pub fn end(data: impl Into<String>) -> Self {
        Self::new(EventKind::End, data)
    }

    pub fn error(data: impl Into<String>) -> Self {
        Self::new(EventKind::Error, data)
    }

    /// Render the event as a server-sent-events line.
    pub fn to_sse_line(&self) -> String {
        // serializing a struct of plain strings cannot fail
        let json = serde_json::to_string(self).unwrap_or_default();
        format!("data: {json}\n\n")
    }
}

/// Cloneable producer handle over a bounded event channel.
#[derive(Debug, Clone)]
pub struct EventSink {
    sender: mpsc::Sender<ProgressEvent>,
}

impl EventSink {
    /// Create a sink with the given queue capacity, returning the consumer end.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Push an event without blocking. Dropped events are logged, not errors.
    pub fn emit(&self, kind: EventKind, data: impl Into<String>) {
        let event = ProgressEvent::new(kind, data);
        if let Err(err) = self.sender.try_send(event) {
            debug!("progress event dropped: {err}");
        }
    }
}

/// Emit through a sink if one is present; absence is not an error.
pub fn emit_if_available(sink: Option<&EventSink>, kind: EventKind, data: impl Into<String>) {
    if let Some(sink) = sink {
        sink.emit(kind, data);
    }
}
