//! Guarded conversational agent workflow built on chatflow-core.
//!
//! Provides the model abstraction, the bounded tool-calling loop, the
//! validation/reasoning/review pipeline nodes, an agent registry with
//! delegation tools, and a streaming bridge for progress events.

pub mod card;
pub mod error;
pub mod factory;
pub mod init;
pub mod model;
pub mod nodes;
pub mod registry;
pub mod registry_tools;
pub mod streaming;
pub mod tool_loop;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use card::*;
pub use error::*;
pub use factory::*;
pub use init::*;
pub use model::*;
pub use registry::*;
pub use registry_tools::*;
pub use streaming::*;
pub use tool_loop::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        card::{AgentCapabilities, AgentCard, AgentSkill, load_agent_cards},
        error::{AgentError, Result},
        factory::{ChatGraphModels, build_chat_graph, load_prompt},
        init::initialize_agents,
        model::{ChatModel, InputReview, StreamChunk, StructuredResponse, input_review_schema},
        nodes::{ErrorHandlerNode, InputGuardNode, OutputGuardNode, ReasoningNode},
        registry::{AgentRegistry, RegistryEntry, normalize_name},
        registry_tools::{InvokeAgentTool, ListAgentsTool},
        streaming::stream_workflow,
        tool_loop::{ToolLoopOutcome, run_tool_loop},
    };
}
