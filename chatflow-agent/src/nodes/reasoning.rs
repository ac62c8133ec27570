//! Core reasoning node: runs the tool-calling loop and records the
//! resulting analysis on the shared state.

use std::sync::Arc;

use chatflow_core::prelude::*;
use serde_json::json;
use tracing::{debug, warn};

use crate::model::ChatModel;
use crate::tool_loop::run_tool_loop;

#[derive(Debug)]
pub struct ReasoningNode {
    model: Arc<dyn ChatModel>,
    routes: RoutingTable,
}

impl ReasoningNode {
    pub fn new(model: Arc<dyn ChatModel>, routes: RoutingTable) -> Self {
        Self { model, routes }
    }

    fn fail(&self, error: impl Into<String>) -> Command {
        Command::new(StateUpdate::new().error(error), self.routes.resolve(END))
    }
}

#[async_trait]
impl FlowNode for ReasoningNode {
    fn name(&self) -> &str {
        super::REASONING
    }

    fn description(&self) -> &str {
        "Analyzes the user's problem, calling tools as needed"
    }

    async fn execute(&self, state: &ChatState, config: &RunConfig) -> Command {
        if state.messages.is_empty() {
            return self.fail("No messages found in state.");
        }
        let Some(user_message) = last_human_message(&state.messages) else {
            return self.fail("No user message found in conversation.");
        };
        let input = user_message.content.clone();

        emit_if_available(
            state.events.as_ref(),
            EventKind::Reasoning,
            "Analyzing the problem...",
        );

        let outcome = run_tool_loop(
            self.model.as_ref(),
            state.messages.clone(),
            config.max_tool_iterations,
            state.events.as_ref(),
        )
        .await;

        match (outcome.final_text, outcome.error) {
            (Some(analysis), None) => {
                debug!(rounds = outcome.messages.len(), "analysis completed");
                let record = json!({
                    "input": input,
                    "analysis": analysis,
                    "node": self.name(),
                });
                Command::new(
                    StateUpdate::new()
                        .messages(outcome.messages)
                        .status("analysis_completed")
                        .analysis(record)
                        .recommendations(vec![analysis])
                        .clear_error(),
                    self.routes.resolve(NEXT_NODE),
                )
            }
            (_, error) => {
                let error = error.unwrap_or_else(|| "Analysis produced no result.".to_string());
                warn!(%error, "analysis failed");
                Command::new(
                    StateUpdate::new().messages(outcome.messages).error(error),
                    self.routes.resolve(END),
                )
            }
        }
    }
}
