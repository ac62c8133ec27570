//! # chatflow-tools
//!
//! Tool system for chatflow agent pipelines: the [`Tool`] trait with
//! schema-validated parameters, fixed [`ToolSet`]s bound to a model, and
//! the built-in domain tools.

pub mod core;
pub mod domain;
pub mod error;
pub mod set;

pub use crate::{
    core::{Tool, ToolParameters, ToolResult, empty_schema},
    domain::{CarStatusTool, TravelRecommendationsTool, TripFeasibilityTool, WeatherTool},
    error::{Result, ToolError},
    set::ToolSet,
};
