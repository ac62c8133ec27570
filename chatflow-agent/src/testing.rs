//! Shared scripted model used by the crate's unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chatflow_core::prelude::Message;
use chatflow_tools::ToolSet;

use crate::error::{AgentError, Result};
use crate::model::{ChatModel, StructuredResponse};

/// A [`ChatModel`] that replays a scripted sequence of replies.
///
/// Replies are consumed front to back. When the queue is empty the
/// optional fallback reply is repeated, which makes it easy to model a
/// backend that requests a tool on every round.
#[derive(Debug, Default)]
pub(crate) struct ScriptedModel {
    replies: Mutex<VecDeque<Message>>,
    fallback: Option<Message>,
    structured: Mutex<VecDeque<Option<serde_json::Value>>>,
    tools: ToolSet,
    fail_with: Option<String>,
    invocations: AtomicUsize,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, message: Message) -> Self {
        self.replies.lock().unwrap().push_back(message);
        self
    }

    pub fn repeating(mut self, message: Message) -> Self {
        self.fallback = Some(message);
        self
    }

    pub fn structured(self, parsed: Option<serde_json::Value>) -> Self {
        self.structured.lock().unwrap().push_back(parsed);
        self
    }

    pub fn with_tools(mut self, tools: ToolSet) -> Self {
        self.tools = tools;
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn invoke(&self, _messages: &[Message]) -> Result<Message> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(AgentError::model(message.clone()));
        }
        let scripted = self.replies.lock().unwrap().pop_front();
        Ok(scripted
            .or_else(|| self.fallback.clone())
            .unwrap_or_else(|| Message::assistant("")))
    }

    async fn invoke_structured(
        &self,
        _messages: &[Message],
        _schema: &serde_json::Value,
    ) -> Result<StructuredResponse> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(AgentError::model(message.clone()));
        }
        let parsed = self.structured.lock().unwrap().pop_front().flatten();
        Ok(StructuredResponse {
            parsed,
            raw: Message::assistant(""),
        })
    }

    fn tools(&self) -> &ToolSet {
        &self.tools
    }
}
