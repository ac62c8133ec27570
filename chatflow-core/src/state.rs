//! Shared workflow state and the partial-update merge contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{event::EventSink, message::Message};

/// The single mutable record threaded through one workflow invocation.
///
/// Owned by the engine for the duration of `invoke`; nodes receive it by
/// reference and mutate it only through [`StateUpdate`]. At the terminal
/// node, at most one of `analysis_result` / `error_message` is set.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    /// Ordered conversation history.
    pub messages: Vec<Message>,
    /// Processing-status label, e.g. "input_validated".
    pub processing_status: Option<String>,
    /// Free-form structured payload produced by reasoning.
    pub analysis_result: Option<Value>,
    /// Recommendation strings extracted from reasoning.
    pub recommendations: Vec<String>,
    /// Technical error recorded by a node, cleared before the caller sees it.
    pub error_message: Option<String>,
    /// Advisory progress sink; absent sinks never affect control flow.
    pub events: Option<EventSink>,
}

impl ChatState {
    /// Start a conversation from a single caller message.
    pub fn from_message(message: Message) -> Self {
        Self {
            messages: vec![message],
            ..Self::default()
        }
    }

    pub fn with_events(mut self, sink: EventSink) -> Self {
        self.events = Some(sink);
        self
    }

    /// Merge a partial update: set fields overwrite wholesale, no deep merge.
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(messages) = update.messages {
            self.messages = messages;
        }
        if let Some(status) = update.processing_status {
            self.processing_status = Some(status);
        }
        if let Some(analysis) = update.analysis_result {
            self.analysis_result = Some(analysis);
        }
        if let Some(recommendations) = update.recommendations {
            self.recommendations = recommendations;
        }
        if update.clear_error {
            self.error_message = None;
        } else if let Some(error) = update.error_message {
            self.error_message = Some(error);
        }
    }
}

/// Partial-state update returned by a node.
///
/// Every field is optional; unset fields leave the state untouched.
/// `clear_error` exists so a node can write `error_message = None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateUpdate {
    pub messages: Option<Vec<Message>>,
    pub processing_status: Option<String>,
    pub analysis_result: Option<Value>,
    pub recommendations: Option<Vec<String>>,
    pub error_message: Option<String>,
    #[serde(default)]
    pub clear_error: bool,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Replace the history with the current one plus an appended message.
    pub fn append_message(self, state: &ChatState, message: Message) -> Self {
        let mut messages = state.messages.clone();
        messages.push(message);
        self.messages(messages)
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.processing_status = Some(status.into());
        self
    }

    pub fn analysis(mut self, analysis: Value) -> Self {
        self.analysis_result = Some(analysis);
        self
    }

    pub fn recommendations(mut self, recommendations: Vec<String>) -> Self {
        self.recommendations = Some(recommendations);
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error_message = Some(error.into());
        self
    }

    pub fn clear_error(mut self) -> Self {
        self.clear_error = true;
        self
    }
}
