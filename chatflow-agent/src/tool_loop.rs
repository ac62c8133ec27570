//! Bounded model/tool conversation loop.
//!
//! The loop alternates between invoking the model and executing the
//! tools it requests, growing the message history as it goes. It never
//! returns a hard error: every failure mode is folded into the outcome
//! so callers can degrade gracefully.

use chatflow_core::prelude::{EventKind, EventSink, Message, emit_if_available};
use tracing::{debug, warn};

use crate::model::ChatModel;

/// Terminal state of one tool loop run.
///
/// Exactly one of `final_text` and `error` is populated. `messages` is
/// the full history in both cases, including any partial rounds that
/// completed before a failure.
#[derive(Debug, Clone)]
pub struct ToolLoopOutcome {
    pub messages: Vec<Message>,
    pub final_text: Option<String>,
    pub error: Option<String>,
}

impl ToolLoopOutcome {
    fn success(messages: Vec<Message>, final_text: String) -> Self {
        Self {
            messages,
            final_text: Some(final_text),
            error: None,
        }
    }

    fn failure(messages: Vec<Message>, error: String) -> Self {
        Self {
            messages,
            final_text: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Run the model against its tools until it answers in plain text or
/// the iteration cap is reached.
///
/// A cap below 1 is treated as 1. An empty history short-circuits
/// without touching the model. Tool calls within a round execute
/// sequentially, in the order the model requested them.
pub async fn run_tool_loop(
    model: &dyn ChatModel,
    mut messages: Vec<Message>,
    max_iterations: usize,
    events: Option<&EventSink>,
) -> ToolLoopOutcome {
    if messages.is_empty() {
        return ToolLoopOutcome::failure(messages, "No messages to process.".to_string());
    }

    let cap = max_iterations.max(1);
    for round in 0..cap {
        debug!(round, cap, "invoking model");
        let reply = match model.invoke(&messages).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(%err, round, "model invocation failed");
                return ToolLoopOutcome::failure(
                    messages,
                    format!("Error during model execution: {err}"),
                );
            }
        };

        messages.push(reply.clone());
        if !reply.has_tool_calls() {
            return ToolLoopOutcome::success(messages, reply.content);
        }

        for call in &reply.tool_calls {
            emit_if_available(
                events,
                EventKind::Reasoning,
                format!("Executing tool '{}'...", call.name),
            );
            debug!(tool = %call.name, "executing requested tool");
            let result = model.tools().run_call(call).await;
            messages.push(result);
        }
    }

    warn!(cap, "tool loop exhausted its iteration budget");
    ToolLoopOutcome::failure(
        messages,
        format!("Maximum tool iterations ({cap}) reached without a final answer."),
    )
}
