//! Terminal guard node.
//!
//! Every conversation ends here with a user-facing assistant message:
//! either a safety-reviewed version of the analysis, a rewrite of a
//! technical error into friendly prose, or a fixed fallback.

use std::sync::Arc;

use chatflow_core::prelude::*;
use futures::StreamExt;
use tracing::{debug, warn};

use crate::model::ChatModel;

#[derive(Debug)]
pub struct OutputGuardNode {
    model: Arc<dyn ChatModel>,
    routes: RoutingTable,
}

impl OutputGuardNode {
    pub fn new(model: Arc<dyn ChatModel>, routes: RoutingTable) -> Self {
        Self { model, routes }
    }

    /// Turn a technical error into something a user can read.
    async fn humanize_error(&self, state: &ChatState, error: &str) -> Command {
        emit_if_available(
            state.events.as_ref(),
            EventKind::Reasoning,
            "Preparing response...",
        );

        let prompt = Message::human(format!(
            "A technical error occurred while handling the user's request: {error}"
        ));
        let (reply, status) = match self.model.invoke(&[prompt]).await {
            Ok(message) if !message.content.trim().is_empty() => {
                (message.content, "error_processed")
            }
            Ok(_) => (super::APOLOGY.to_string(), "error_processed"),
            Err(err) => {
                warn!(%err, "error rewrite failed");
                (super::APOLOGY_ESCALATED.to_string(), "error_processing_failed")
            }
        };

        Command::new(
            StateUpdate::new()
                .append_message(state, Message::assistant(reply))
                .status(status)
                .clear_error(),
            self.routes.resolve(END),
        )
    }

    /// Safety-review the analysis, forwarding fragments as chunk events.
    async fn review_analysis(&self, state: &ChatState, recommendation: &str) -> Command {
        emit_if_available(
            state.events.as_ref(),
            EventKind::Reasoning,
            "Reviewing response...",
        );

        let question = last_human_message(&state.messages)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let prompt = Message::human(format!(
            "User question: {question}\n\nProposed answer: {recommendation}"
        ));

        let reviewed = match self.model.stream(&[prompt]).await {
            Ok(mut stream) => {
                let mut collected = String::new();
                let mut failed = false;
                while let Some(fragment) = stream.next().await {
                    match fragment {
                        Ok(chunk) => {
                            emit_if_available(
                                state.events.as_ref(),
                                EventKind::Chunk,
                                chunk.delta.clone(),
                            );
                            collected.push_str(&chunk.delta);
                        }
                        Err(err) => {
                            warn!(%err, "review stream broke mid-flight");
                            failed = true;
                            break;
                        }
                    }
                }
                if failed || collected.trim().is_empty() {
                    None
                } else {
                    Some(collected)
                }
            }
            Err(err) => {
                warn!(%err, "review stream could not start");
                None
            }
        };

        let (reply, status) = match reviewed {
            Some(text) => (text, "completed_successfully"),
            None => (super::SAFE_FALLBACK.to_string(), "completed_with_fallback"),
        };
        debug!(status, "final response prepared");

        Command::new(
            StateUpdate::new()
                .append_message(state, Message::assistant(reply))
                .status(status),
            self.routes.resolve(END),
        )
    }
}

#[async_trait]
impl FlowNode for OutputGuardNode {
    fn name(&self) -> &str {
        super::OUTPUT_GUARD
    }

    fn description(&self) -> &str {
        "Reviews the final response and converts errors into friendly prose"
    }

    async fn execute(&self, state: &ChatState, _config: &RunConfig) -> Command {
        if let Some(error) = &state.error_message {
            return self.humanize_error(state, error).await;
        }

        let recommendation = state
            .recommendations
            .first()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty());
        match (state.analysis_result.as_ref(), recommendation) {
            (Some(_), Some(recommendation)) => self.review_analysis(state, recommendation).await,
            _ => Command::new(
                StateUpdate::new()
                    .append_message(state, Message::assistant(super::NO_ANALYSIS))
                    .status("completed_no_analysis"),
                self.routes.resolve(END),
            ),
        }
    }
}
