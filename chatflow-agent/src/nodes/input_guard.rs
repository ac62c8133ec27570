//! Input validation node.
//!
//! Classifies the latest user message with a structured-output model
//! call. Valid input moves the conversation forward; everything else
//! records an error and hands off to the terminal guard.

use std::sync::Arc;

use chatflow_core::prelude::*;
use tracing::{debug, warn};

use crate::model::{ChatModel, InputReview, input_review_schema};

const VALIDATION_FAILURE: &str = "Input validation produced an unusable result.";

#[derive(Debug)]
pub struct InputGuardNode {
    model: Arc<dyn ChatModel>,
    routes: RoutingTable,
}

impl InputGuardNode {
    pub fn new(model: Arc<dyn ChatModel>, routes: RoutingTable) -> Self {
        Self { model, routes }
    }

    fn reject(&self, error: impl Into<String>) -> Command {
        Command::new(StateUpdate::new().error(error), self.routes.resolve(END))
    }
}

#[async_trait]
impl FlowNode for InputGuardNode {
    fn name(&self) -> &str {
        super::INPUT_GUARD
    }

    fn description(&self) -> &str {
        "Validates that the latest user message is meaningful and on-topic"
    }

    async fn execute(&self, state: &ChatState, _config: &RunConfig) -> Command {
        if state.messages.is_empty() {
            return self.reject("No messages found in state.");
        }
        let Some(user_message) = last_human_message(&state.messages) else {
            return self.reject("No user message found in conversation.");
        };

        emit_if_available(
            state.events.as_ref(),
            EventKind::Reasoning,
            "Validating input...",
        );

        let schema = input_review_schema();
        let review = match self
            .model
            .invoke_structured(std::slice::from_ref(user_message), &schema)
            .await
        {
            Ok(response) => response
                .parsed
                .and_then(|value| serde_json::from_value::<InputReview>(value).ok()),
            Err(err) => {
                warn!(%err, "input validation call failed");
                None
            }
        };

        match review {
            Some(review) if review.is_valid => {
                debug!("input accepted");
                Command::new(
                    StateUpdate::new().status("input_validated").clear_error(),
                    self.routes.resolve(NEXT_NODE),
                )
            }
            Some(review) => {
                let reason = review
                    .error_message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Invalid input.".to_string());
                debug!(%reason, "input rejected");
                self.reject(reason)
            }
            None => self.reject(VALIDATION_FAILURE),
        }
    }
}
