//! Graph assembly for the guarded chat workflow.
//!
//! The shape is fixed: validation first, then reasoning, and every path
//! funnels through the output guard before the workflow ends.

use std::path::Path;
use std::sync::Arc;

use chatflow_core::prelude::*;

use crate::error::AgentError;
use crate::model::ChatModel;
use crate::nodes::{
    INPUT_GUARD, InputGuardNode, OUTPUT_GUARD, OutputGuardNode, REASONING, ReasoningNode,
};

/// The model handle behind each pipeline step. The three slots may share
/// one model or carry differently prompted ones.
#[derive(Debug, Clone)]
pub struct ChatGraphModels {
    pub input_guard: Arc<dyn ChatModel>,
    pub reasoning: Arc<dyn ChatModel>,
    pub output_guard: Arc<dyn ChatModel>,
}

impl ChatGraphModels {
    /// Use a single model for every step.
    pub fn shared(model: Arc<dyn ChatModel>) -> Self {
        Self {
            input_guard: model.clone(),
            reasoning: model.clone(),
            output_guard: model,
        }
    }
}

/// Build the three-step guarded workflow.
///
/// Only the entry edge is static. Each node decides its successor at
/// runtime through its routing table, so rejected input skips reasoning
/// and goes straight to the output guard.
pub fn build_chat_graph(models: ChatGraphModels) -> Result<CompiledGraph> {
    let input_routes = RoutingTable::new()
        .next_node(REASONING)
        .end(GraphTarget::node(OUTPUT_GUARD));
    let reasoning_routes = RoutingTable::new()
        .next_node(OUTPUT_GUARD)
        .end(GraphTarget::node(OUTPUT_GUARD));
    let output_routes = RoutingTable::new().end(GraphTarget::End);

    GraphBuilder::new()
        .name("chat_workflow")
        .node(INPUT_GUARD, InputGuardNode::new(models.input_guard, input_routes))
        .node(REASONING, ReasoningNode::new(models.reasoning, reasoning_routes))
        .node(
            OUTPUT_GUARD,
            OutputGuardNode::new(models.output_guard, output_routes),
        )
        .entry(INPUT_GUARD)
        .build()
}

/// Load a markdown prompt from `<dir>/<name>.md`.
pub fn load_prompt(dir: impl AsRef<Path>, name: &str) -> crate::error::Result<String> {
    let path = dir.as_ref().join(format!("{name}.md"));
    std::fs::read_to_string(&path).map_err(|err| {
        AgentError::configuration(format!("cannot read prompt {}: {err}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::testing::ScriptedModel;

    fn models(
        input_guard: ScriptedModel,
        reasoning: ScriptedModel,
        output_guard: ScriptedModel,
    ) -> ChatGraphModels {
        ChatGraphModels {
            input_guard: Arc::new(input_guard),
            reasoning: Arc::new(reasoning),
            output_guard: Arc::new(output_guard),
        }
    }

    #[tokio::test]
    async fn test_happy_path_runs_all_three_steps() {
        let graph = build_chat_graph(models(
            ScriptedModel::new()
                .structured(Some(json!({"is_valid": true, "error_message": null}))),
            ScriptedModel::new().reply(Message::assistant("Check your battery.")),
            ScriptedModel::new().reply(Message::assistant("Check your battery.")),
        ))
        .unwrap();

        let state = ChatState::from_message(Message::human("My car won't start"));
        let result = graph.invoke(state, &RunConfig::default()).await.unwrap();

        assert_eq!(
            result.processing_status.as_deref(),
            Some("completed_successfully")
        );
        assert_eq!(result.error_message, None);
        let reply = result.messages.last().unwrap();
        assert!(reply.is_assistant());
        assert_eq!(reply.content, "Check your battery.");
        assert!(result.analysis_result.is_some());
    }

    #[tokio::test]
    async fn test_rejected_input_skips_reasoning() {
        let graph = build_chat_graph(ChatGraphModels {
            input_guard: Arc::new(ScriptedModel::new().structured(Some(
                json!({"is_valid": false, "error_message": "Please ask a real question."}),
            ))),
            reasoning: Arc::new(ScriptedModel::new()),
            output_guard: Arc::new(
                ScriptedModel::new().reply(Message::assistant("Could you rephrase that?")),
            ),
        })
        .unwrap();

        let state = ChatState::from_message(Message::human(""));
        let result = graph.invoke(state, &RunConfig::default()).await.unwrap();

        assert_eq!(result.processing_status.as_deref(), Some("error_processed"));
        // the guard consumed the error and answered in friendly prose
        assert_eq!(result.error_message, None);
        assert_eq!(
            result.messages.last().unwrap().content,
            "Could you rephrase that?"
        );
    }

    #[tokio::test]
    async fn test_empty_history_never_reaches_validation_or_reasoning() {
        let input_guard = Arc::new(ScriptedModel::new());
        let reasoning = Arc::new(ScriptedModel::new());
        let graph = build_chat_graph(ChatGraphModels {
            input_guard: input_guard.clone(),
            reasoning: reasoning.clone(),
            output_guard: Arc::new(
                ScriptedModel::new().reply(Message::assistant("Nothing to answer yet.")),
            ),
        })
        .unwrap();

        let result = graph
            .invoke(ChatState::default(), &RunConfig::default())
            .await
            .unwrap();

        assert_eq!(input_guard.invocations(), 0);
        assert_eq!(reasoning.invocations(), 0);
        assert_eq!(result.processing_status.as_deref(), Some("error_processed"));
        assert_eq!(result.error_message, None);
    }

    #[tokio::test]
    async fn test_reasoning_failure_ends_with_processed_error() {
        let graph = build_chat_graph(models(
            ScriptedModel::new()
                .structured(Some(json!({"is_valid": true, "error_message": null}))),
            ScriptedModel::new().failing("backend down"),
            ScriptedModel::new().reply(Message::assistant("We hit a snag, please retry.")),
        ))
        .unwrap();

        let state = ChatState::from_message(Message::human("help"));
        let result = graph.invoke(state, &RunConfig::default()).await.unwrap();

        assert_eq!(result.processing_status.as_deref(), Some("error_processed"));
        assert_eq!(result.error_message, None);
    }
}
