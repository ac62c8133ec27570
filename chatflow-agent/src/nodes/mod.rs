//! Workflow nodes for the guarded chat pipeline.
//!
//! Each node owns a model handle and a routing table; the engine only
//! sees the [`FlowNode`](chatflow_core::prelude::FlowNode) trait.

pub mod error_handler;
pub mod input_guard;
pub mod output_guard;
pub mod reasoning;

pub use error_handler::ErrorHandlerNode;
pub use input_guard::InputGuardNode;
pub use output_guard::OutputGuardNode;
pub use reasoning::ReasoningNode;

/// Canonical node names, shared with the graph factory.
pub const INPUT_GUARD: &str = "input_guard";
pub const REASONING: &str = "reasoning";
pub const OUTPUT_GUARD: &str = "output_guard";
pub const ERROR_HANDLER: &str = "error_handler";

/// Fixed user-facing texts. Model-generated prose replaces these whenever
/// the model cooperates; they are the floor, not the norm.
pub(crate) const APOLOGY: &str = "Sorry, a technical problem occurred. Please try again.";
pub(crate) const APOLOGY_ESCALATED: &str =
    "Sorry, a technical problem occurred. Our team has been notified and is working on it.";
pub(crate) const NO_ANALYSIS: &str =
    "Sorry, I could not process your request properly. Please try rephrasing your question.";
pub(crate) const SAFE_FALLBACK: &str =
    "Based on your description, I recommend consulting a qualified professional for a proper assessment of the problem.";
