//! # chatflow-core
//!
//! Dynamic-routing workflow engine for conversational agent pipelines.
//!
//! ## Core concepts
//!
//! - **Message**: one entry in the conversation history, optionally carrying
//!   tool-call requests or a tool-result correlation id
//! - **ChatState**: the shared record threaded through one invocation
//! - **FlowNode**: a unit of workflow logic returning a state delta plus an
//!   explicit next-node decision
//! - **CompiledGraph**: holds named nodes and one static entry edge, then
//!   follows each node's decision until the terminal marker
//! - **EventSink**: bounded, non-blocking channel for advisory progress
//!   events relayed to streaming callers

pub mod error;
pub mod event;
pub mod graph;
pub mod message;
pub mod node;
pub mod state;

/// Convenient re-exports for common use.
pub mod prelude {
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};

    pub use crate::{
        error::{FlowError, Result},
        event::{EventKind, EventSink, ProgressEvent, emit_if_available},
        graph::{CompiledGraph, GraphBuilder},
        message::{Message, Role, ToolCall, last_assistant_message, last_human_message},
        node::{Command, END, FlowNode, GraphTarget, NEXT_NODE, RoutingTable, RunConfig},
        state::{ChatState, StateUpdate},
    };
}
