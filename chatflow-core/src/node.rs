//! Node abstraction: a unit of workflow logic with a fixed routing table.

use std::{collections::HashMap, fmt::Debug};

use async_trait::async_trait;

use crate::state::{ChatState, StateUpdate};

/// Routing outcome name for the success path.
pub const NEXT_NODE: &str = "next_node";
/// Routing outcome name for the error/end path.
pub const END: &str = "end";

/// A concrete routing destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphTarget {
    /// Transition to the named node.
    Node(String),
    /// Terminal marker: the workflow stops.
    End,
}

impl GraphTarget {
    pub fn node(name: impl Into<String>) -> Self {
        Self::Node(name.into())
    }

    pub fn is_end(&self) -> bool {
        matches!(self, GraphTarget::End)
    }
}

/// Immutable map from symbolic outcome names to destinations.
///
/// Built once at workflow construction. Unknown outcomes resolve to the
/// terminal marker so a mis-wired node can never run unbounded.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    routes: HashMap<String, GraphTarget>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, outcome: impl Into<String>, target: GraphTarget) -> Self {
        self.routes.insert(outcome.into(), target);
        self
    }

    /// Success path shorthand.
    pub fn next_node(self, name: impl Into<String>) -> Self {
        self.route(NEXT_NODE, GraphTarget::node(name))
    }

    /// Error/end path shorthand.
    pub fn end(self, target: GraphTarget) -> Self {
        self.route(END, target)
    }

    pub fn resolve(&self, outcome: &str) -> GraphTarget {
        self.routes.get(outcome).cloned().unwrap_or(GraphTarget::End)
    }
}

/// A node's output: a state delta plus the next destination.
#[derive(Debug, Clone)]
pub struct Command {
    pub update: StateUpdate,
    pub next: GraphTarget,
}

impl Command {
    pub fn new(update: StateUpdate, next: GraphTarget) -> Self {
        Self { update, next }
    }

    /// Terminate the workflow with the given update.
    pub fn end(update: StateUpdate) -> Self {
        Self {
            update,
            next: GraphTarget::End,
        }
    }
}

/// Per-invocation runtime configuration.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Upper bound on tool-calling rounds per reasoning pass.
    pub max_tool_iterations: usize,
    /// Caller-supplied conversation id, for tracing only.
    pub thread_id: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_tool_iterations: 10,
            thread_id: None,
        }
    }
}

impl RunConfig {
    pub fn with_max_tool_iterations(mut self, max: usize) -> Self {
        self.max_tool_iterations = max;
        self
    }

    pub fn with_thread_id(mut self, id: impl Into<String>) -> Self {
        self.thread_id = Some(id.into());
        self
    }
}

/// Trait for workflow nodes.
///
/// A node reads the shared state, performs validation or model work, and
/// returns a [`Command`] carrying its state delta and next-node decision.
/// Implementations must not fail: recoverable conditions are encoded into
/// the update's `error_message` plus a routing decision.
#[async_trait]
pub trait FlowNode: Send + Sync + Debug {
    /// Name used for graph registration and logging.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str {
        ""
    }

    /// Execute the node's logic against the current state.
    async fn execute(&self, state: &ChatState, config: &RunConfig) -> Command;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn routing_table_resolves_known_outcomes() {
        let table = RoutingTable::new()
            .next_node("reasoning")
            .end(GraphTarget::node("output_guard"));

        assert_eq!(table.resolve(NEXT_NODE), GraphTarget::node("reasoning"));
        assert_eq!(table.resolve(END), GraphTarget::node("output_guard"));
    }

    #[test]
    fn unknown_outcome_falls_back_to_end() {
        let table = RoutingTable::new().next_node("reasoning");
        assert_eq!(table.resolve("missing"), GraphTarget::End);
    }

    #[test]
    fn default_config_caps_iterations_at_ten() {
        assert_eq!(RunConfig::default().max_tool_iterations, 10);
    }
}
