//! Error types for chatflow agent operations.

use chatflow_core::prelude::FlowError;
use chatflow_tools::ToolError;
use thiserror::Error;

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Main error type for agent operations.
#[derive(Error, Debug, Clone)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Tool execution error: {tool}: {message}")]
    ToolExecution { tool: String, message: String },

    #[error("Agent delegation error: {target}: {message}")]
    Delegation { target: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Streaming error: {0}")]
    Streaming(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AgentError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a model error
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model(message.into())
    }

    /// Create a tool execution error
    pub fn tool_execution(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a delegation error
    pub fn delegation(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delegation {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a streaming error
    pub fn streaming(message: impl Into<String>) -> Self {
        Self::Streaming(message.into())
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if the error is a user error
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::Validation(_) | Self::NotFound(_)
        )
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Model(_) => "model",
            Self::ToolExecution { .. } => "tool_execution",
            Self::Delegation { .. } => "delegation",
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Streaming(_) => "streaming",
            Self::Serialization(_) => "serialization",
            Self::Internal(_) => "internal",
        }
    }
}

// Standard library integrations
impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AgentError {
    fn from(err: std::io::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}

// Integration with chatflow-tools
impl From<ToolError> for AgentError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::NotFound(name) => Self::NotFound(name),
            other => Self::ToolExecution {
                tool: "unknown".to_string(),
                message: other.to_string(),
            },
        }
    }
}

// Integration with chatflow-core
impl From<FlowError> for AgentError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::Construction(msg) => Self::Configuration(msg),
            FlowError::Serialization(e) => Self::Serialization(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<AgentError> for FlowError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Configuration(msg) => FlowError::construction(msg),
            AgentError::Serialization(msg) => {
                FlowError::execution(format!("serialization failed: {msg}"))
            }
            other => FlowError::execution(other.to_string()),
        }
    }
}
