//! Fixed tool sets bound to a model, and the invocation contract that turns
//! tool calls into tool-result messages.

use std::sync::Arc;

use chatflow_core::message::{Message, ToolCall};
use tracing::{debug, warn};

use crate::core::Tool;

/// An immutable, ordered set of tools bound to a model at construction.
///
/// Resolution failures and execution failures are recoverable by contract:
/// both become tool-result messages, never hard errors.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSet").field("names", &self.names()).finish()
    }
}

impl ToolSet {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    pub fn with_tool_arc(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Name and description of every tool, for prompt assembly.
    pub fn describe(&self) -> Vec<(String, String)> {
        self.tools
            .iter()
            .map(|t| (t.name().to_string(), t.description().to_string()))
            .collect()
    }

    /// Execute one tool call and convert the outcome into a tool-result
    /// message carrying the call's correlation id.
    pub async fn run_call(&self, call: &ToolCall) -> Message {
        let Some(tool) = self.get(&call.name) else {
            warn!(tool = %call.name, "requested tool not found");
            return Message::tool_result(&call.id, format!("Tool '{}' not found.", call.name));
        };

        let parameters = crate::core::ToolParameters::new(call.arguments.clone());
        if let Err(err) = tool.validate_parameters(&parameters) {
            warn!(tool = %call.name, %err, "tool parameter validation failed");
            return Message::tool_result(
                &call.id,
                format!("Tool '{}' execution error: {err}", call.name),
            );
        }

        match tool.execute(parameters).await {
            Ok(result) if result.is_success() => {
                debug!(tool = %call.name, "tool executed");
                Message::tool_result(&call.id, result.content)
            }
            Ok(result) => Message::tool_result(
                &call.id,
                format!(
                    "Tool '{}' execution error: {}",
                    call.name,
                    result.error.unwrap_or_else(|| "unknown failure".to_string())
                ),
            ),
            Err(err) => {
                warn!(tool = %call.name, %err, "tool execution failed");
                Message::tool_result(
                    &call.id,
                    format!("Tool '{}' execution error: {err}", call.name),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{
        core::{Tool, ToolParameters, ToolResult, empty_schema},
        error::{Result, ToolError},
    };

    struct OkTool;

    #[async_trait]
    impl Tool for OkTool {
        fn name(&self) -> &str {
            "ok"
        }
        fn description(&self) -> &str {
            "Always succeeds"
        }
        fn parameter_schema(&self) -> serde_json::Value {
            empty_schema()
        }
        async fn execute(&self, _parameters: ToolParameters) -> Result<ToolResult> {
            Ok(ToolResult::success("done"))
        }
    }

    struct FailTool;

    #[async_trait]
    impl Tool for FailTool {
        fn name(&self) -> &str {
            "fail"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        fn parameter_schema(&self) -> serde_json::Value {
            empty_schema()
        }
        async fn execute(&self, _parameters: ToolParameters) -> Result<ToolResult> {
            Err(ToolError::execution("exploded"))
        }
    }

    #[tokio::test]
    async fn run_call_success_carries_correlation_id() {
        let set = ToolSet::empty().with_tool(OkTool);
        let call = ToolCall::new("ok", json!({})).with_id("call-7");

        let msg = set.run_call(&call).await;
        assert_eq!(msg.tool_call_id.as_deref(), Some("call-7"));
        assert_eq!(msg.content, "done");
    }

    #[tokio::test]
    async fn unresolved_tool_is_recoverable() {
        let set = ToolSet::empty();
        let call = ToolCall::new("ghost", json!({}));

        let msg = set.run_call(&call).await;
        assert_eq!(msg.content, "Tool 'ghost' not found.");
    }

    #[tokio::test]
    async fn execution_failure_is_recoverable() {
        let set = ToolSet::empty().with_tool(FailTool);
        let call = ToolCall::new("fail", json!({}));

        let msg = set.run_call(&call).await;
        assert!(msg.content.starts_with("Tool 'fail' execution error:"));
        assert!(msg.content.contains("exploded"));
    }

    #[test]
    fn lookup_and_describe() {
        let set = ToolSet::empty().with_tool(OkTool).with_tool(FailTool);
        assert_eq!(set.len(), 2);
        assert!(set.get("ok").is_some());
        assert!(set.get("missing").is_none());
        assert_eq!(set.names(), vec!["ok", "fail"]);
        assert_eq!(set.describe()[0].1, "Always succeeds");
    }
}
