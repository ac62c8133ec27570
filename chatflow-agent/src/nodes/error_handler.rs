//! Standalone error-handling node.
//!
//! Used by graphs that terminate failures on a dedicated step instead of
//! the combined output guard. Translates the recorded technical error
//! into user-facing prose, with a fixed apology as the floor.

use std::sync::Arc;

use chatflow_core::prelude::*;
use tracing::warn;

use crate::model::ChatModel;

#[derive(Debug)]
pub struct ErrorHandlerNode {
    model: Arc<dyn ChatModel>,
    routes: RoutingTable,
}

impl ErrorHandlerNode {
    pub fn new(model: Arc<dyn ChatModel>, routes: RoutingTable) -> Self {
        Self { model, routes }
    }
}

#[async_trait]
impl FlowNode for ErrorHandlerNode {
    fn name(&self) -> &str {
        super::ERROR_HANDLER
    }

    fn description(&self) -> &str {
        "Turns technical failures into a readable reply for the user"
    }

    async fn execute(&self, state: &ChatState, _config: &RunConfig) -> Command {
        let Some(error) = state.error_message.clone() else {
            // nothing recorded; close out with the generic apology
            return Command::new(
                StateUpdate::new()
                    .append_message(state, Message::assistant(super::APOLOGY))
                    .status("error_processed")
                    .clear_error(),
                self.routes.resolve(END),
            );
        };

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
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::ScriptedModel;

    #[tokio::test]
    async fn test_rewrites_recorded_error() {
        let model =
            Arc::new(ScriptedModel::new().reply(Message::assistant("Please try again shortly.")));
        let node = ErrorHandlerNode::new(model, RoutingTable::new());
        let mut state = ChatState::from_message(Message::human("hi"));
        state.error_message = Some("timeout talking to backend".to_string());

        let command = node.execute(&state, &RunConfig::default()).await;

        assert_eq!(command.next, GraphTarget::End);
        assert_eq!(
            command.update.processing_status.as_deref(),
            Some("error_processed")
        );
        assert!(command.update.clear_error);
        let messages = command.update.messages.unwrap();
        assert_eq!(messages.last().unwrap().content, "Please try again shortly.");
    }

    #[tokio::test]
    async fn test_no_error_recorded_still_produces_apology() {
        let model = Arc::new(ScriptedModel::new());
        let node = ErrorHandlerNode::new(model.clone(), RoutingTable::new());
        let state = ChatState::from_message(Message::human("hi"));

        let command = node.execute(&state, &RunConfig::default()).await;

        assert_eq!(model.invocations(), 0);
        let messages = command.update.messages.unwrap();
        assert_eq!(messages.last().unwrap().content, super::super::APOLOGY);
    }
}
