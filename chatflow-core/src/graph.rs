//! Workflow engine: holds named nodes and follows their routing decisions.

use std::{collections::HashMap, sync::Arc, time::Instant};

use tracing::{debug, info};

use crate::{
    error::{FlowError, Result},
    node::{Command, FlowNode, GraphTarget, RunConfig},
    state::ChatState,
};

/// Safety bound on steps per invocation. The default topology visits each
/// node at most once, so hitting this means a mis-wired routing table.
const MAX_STEPS: usize = 100;

/// A built workflow ready for execution.
pub struct CompiledGraph {
    nodes: HashMap<String, Arc<dyn FlowNode>>,
    entry: String,
    name: String,
}

impl std::fmt::Debug for CompiledGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGraph")
            .field("name", &self.name)
            .field("entry", &self.entry)
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CompiledGraph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the workflow to its terminal marker.
    ///
    /// Execution is strictly sequential: one node at a time, each node's
    /// update merged into the state before the next decision is followed.
    pub async fn invoke(&self, mut state: ChatState, config: &RunConfig) -> Result<ChatState> {
        let started = Instant::now();
        let mut current = self.entry.clone();
        let mut steps = 0usize;

        loop {
            steps += 1;
            if steps > MAX_STEPS {
                return Err(FlowError::execution(format!(
                    "workflow '{}' exceeded maximum steps ({MAX_STEPS})",
                    self.name
                )));
            }

            let node = self.nodes.get(&current).ok_or_else(|| {
                FlowError::execution(format!("no node registered under '{current}'"))
            })?;

            debug!(node = %current, step = steps, "executing node");
            let Command { update, next } = node.execute(&state, config).await;
            state.apply(update);

            match next {
                GraphTarget::Node(name) => {
                    debug!(from = %current, to = %name, "routing");
                    current = name;
                }
                GraphTarget::End => {
                    info!(
                        workflow = %self.name,
                        steps,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        status = state.processing_status.as_deref().unwrap_or(""),
                        "workflow reached terminal"
                    );
                    return Ok(state);
                }
            }
        }
    }
}

/// Builder for [`CompiledGraph`].
///
/// Registers named nodes and exactly one static entry edge; every other
/// transition is resolved dynamically from each node's `Command`.
pub struct GraphBuilder {
    nodes: HashMap<String, Arc<dyn FlowNode>>,
    entry: Option<String>,
    name: String,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            entry: None,
            name: "chat_workflow".to_string(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Register a node under the given name.
    pub fn node(mut self, name: impl Into<String>, node: impl FlowNode + 'static) -> Self {
        self.nodes.insert(name.into(), Arc::new(node));
        self
    }

    /// Register an already-shared node.
    pub fn node_arc(mut self, name: impl Into<String>, node: Arc<dyn FlowNode>) -> Self {
        self.nodes.insert(name.into(), node);
        self
    }

    /// Set the single static edge from START to the entry node.
    pub fn entry(mut self, name: impl Into<String>) -> Self {
        self.entry = Some(name.into());
        self
    }

    pub fn build(self) -> Result<CompiledGraph> {
        let entry = self
            .entry
            .ok_or_else(|| FlowError::construction("entry node not set"))?;
        if self.nodes.is_empty() {
            return Err(FlowError::construction("no nodes added to graph"));
        }
        if !self.nodes.contains_key(&entry) {
            return Err(FlowError::construction(format!(
                "entry node '{entry}' is not registered"
            )));
        }
        Ok(CompiledGraph {
            nodes: self.nodes,
            entry,
            name: self.name,
        })
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
