//! Tools that expose the agent registry to a tool-calling model, so an
//! orchestrating agent can discover and delegate to other agents.

use std::sync::Arc;

use async_trait::async_trait;
use chatflow_tools::{Tool, ToolParameters, ToolResult, empty_schema};
use serde_json::json;

use crate::registry::AgentRegistry;

/// Lists every registered agent as a JSON array of name/description pairs.
#[derive(Debug)]
pub struct ListAgentsTool {
    registry: Arc<AgentRegistry>,
}

impl ListAgentsTool {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Tool for ListAgentsTool {
    fn name(&self) -> &str {
        "list_agents"
    }

    fn description(&self) -> &str {
        "List the available agents with their descriptions"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        empty_schema()
    }

    async fn execute(&self, _params: ToolParameters) -> chatflow_tools::Result<ToolResult> {
        let agents: Vec<serde_json::Value> = self
            .registry
            .list_cards()
            .into_iter()
            .map(|card| json!({"name": card.name, "description": card.description}))
            .collect();
        Ok(ToolResult::success(serde_json::to_string(&agents)?))
    }
}

/// Sends one query to a named agent and returns its textual reply.
#[derive(Debug)]
pub struct InvokeAgentTool {
    registry: Arc<AgentRegistry>,
}

impl InvokeAgentTool {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Tool for InvokeAgentTool {
    fn name(&self) -> &str {
        "invoke_agent"
    }

    fn description(&self) -> &str {
        "Send a question to another agent and return its answer"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "agent_name": {
                    "type": "string",
                    "description": "Name of the agent to contact"
                },
                "query": {
                    "type": "string",
                    "description": "Question to send to the agent"
                }
            },
            "required": ["agent_name", "query"]
        })
    }

    async fn execute(&self, params: ToolParameters) -> chatflow_tools::Result<ToolResult> {
        let agent_name = params.get_string("agent_name")?;
        let query = params.get_string("query")?;
        let reply = self.registry.invoke(&agent_name, &query).await;
        Ok(ToolResult::success(reply))
    }
}

#[cfg(test)]
mod tests {
    use chatflow_core::prelude::Message;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::card::AgentCard;
    use crate::testing::ScriptedModel;

    fn registry_with_agent() -> Arc<AgentRegistry> {
        let registry = Arc::new(AgentRegistry::new());
        registry.register(
            AgentCard::new("mechanic", "diagnoses car trouble"),
            Arc::new(ScriptedModel::new().reply(Message::assistant("Check your battery."))),
        );
        registry
    }

    #[tokio::test]
    async fn test_list_agents_returns_json_directory() {
        let tool = ListAgentsTool::new(registry_with_agent());
        let result = tool.execute(ToolParameters::new(json!({}))).await.unwrap();

        assert!(result.success);
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&result.content).unwrap();
        assert_eq!(parsed[0]["name"], "mechanic");
        assert_eq!(parsed[0]["description"], "diagnoses car trouble");
    }

    #[tokio::test]
    async fn test_invoke_agent_relays_reply() {
        let tool = InvokeAgentTool::new(registry_with_agent());
        let params = ToolParameters::new(json!({"agent_name": "Mechanic", "query": "car dead"}));

        let result = tool.execute(params).await.unwrap();
        assert_eq!(result.content, "Check your battery.");
    }

    #[tokio::test]
    async fn test_invoke_agent_requires_both_arguments() {
        let tool = InvokeAgentTool::new(registry_with_agent());
        let params = ToolParameters::new(json!({"agent_name": "Mechanic"}));

        assert!(tool.execute(params).await.is_err());
    }
}
