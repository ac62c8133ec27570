//! Chat model abstraction used by workflow nodes and the tool loop.
//!
//! Concrete backends live outside this crate. Anything that can turn a
//! conversation into an assistant reply can drive the workflow by
//! implementing [`ChatModel`].

use async_trait::async_trait;
use chatflow_core::prelude::Message;
use chatflow_tools::ToolSet;
use futures::stream::BoxStream;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single fragment of an incrementally generated reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    pub delta: String,
}

impl StreamChunk {
    pub fn new(delta: impl Into<String>) -> Self {
        Self {
            delta: delta.into(),
        }
    }
}

/// Result of a structured-output invocation.
///
/// `parsed` is `None` when the backend produced a reply that does not
/// conform to the requested schema. The raw assistant message is kept
/// for diagnostics either way.
#[derive(Debug, Clone)]
pub struct StructuredResponse {
    pub parsed: Option<serde_json::Value>,
    pub raw: Message,
}

/// Verdict produced by the input validation step.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InputReview {
    /// Whether the user message is meaningful and on-topic.
    pub is_valid: bool,
    /// Human-readable reason when the message is rejected.
    pub error_message: Option<String>,
}

/// A conversational model with optional tool access.
///
/// `invoke` is the only method a backend must implement. The default
/// `stream` degrades gracefully to a single fragment carrying the full
/// reply, and `tools` defaults to an empty set.
#[async_trait]
pub trait ChatModel: Send + Sync + std::fmt::Debug {
    /// Produce an assistant reply for the given conversation.
    ///
    /// The reply may carry tool calls, in which case the caller is
    /// expected to execute them and invoke the model again.
    async fn invoke(&self, messages: &[Message]) -> Result<Message>;

    /// Produce a reply constrained to the given JSON schema.
    async fn invoke_structured(
        &self,
        messages: &[Message],
        schema: &serde_json::Value,
    ) -> Result<StructuredResponse> {
        let _ = schema;
        let raw = self.invoke(messages).await?;
        let parsed = serde_json::from_str(&raw.content).ok();
        Ok(StructuredResponse { parsed, raw })
    }

    /// Produce the reply incrementally.
    async fn stream(&self, messages: &[Message]) -> Result<BoxStream<'static, Result<StreamChunk>>> {
        let reply = self.invoke(messages).await?;
        let fragment = StreamChunk::new(reply.content);
        Ok(Box::pin(futures::stream::iter([Ok(fragment)])))
    }

    /// Tools this model may request during a conversation.
    fn tools(&self) -> &ToolSet;
}

/// JSON schema for [`InputReview`], in the shape structured-output
/// backends expect.
pub fn input_review_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(InputReview)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::ScriptedModel;

    #[test]
    fn test_input_review_schema_names_fields() {
        let schema = input_review_schema();
        let properties = schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("is_valid"));
        assert!(properties.contains_key("error_message"));
    }

    #[tokio::test]
    async fn test_default_stream_yields_single_fragment() {
        let model = ScriptedModel::new().reply(Message::assistant("hello there"));
        let mut stream = model.stream(&[Message::human("hi")]).await.unwrap();

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.delta, "hello there");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_default_structured_parses_json_content() {
        let model = ScriptedModel::new().reply(Message::assistant(
            r#"{"is_valid": true, "error_message": null}"#,
        ));
        let response = model
            .invoke_structured(&[Message::human("hi")], &input_review_schema())
            .await
            .unwrap();

        let review: InputReview = serde_json::from_value(response.parsed.unwrap()).unwrap();
        assert!(review.is_valid);
        assert_eq!(review.error_message, None);
    }
}
