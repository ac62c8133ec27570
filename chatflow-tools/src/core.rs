use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::{Result, ToolError};

/// Core trait for all tools in the system.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's unique name
    fn name(&self) -> &str;

    /// Get the tool's description
    fn description(&self) -> &str;

    /// Get the JSON parameter schema for the tool
    fn parameter_schema(&self) -> serde_json::Value;

    /// Execute the tool with given parameters
    async fn execute(&self, parameters: ToolParameters) -> Result<ToolResult>;

    /// Validate parameters before execution (optional override)
    fn validate_parameters(&self, parameters: &ToolParameters) -> Result<()> {
        let schema = self.parameter_schema();
        let compiled = jsonschema::Validator::new(&schema)
            .map_err(|e| ToolError::validation(format!("Invalid schema: {e}")))?;

        match compiled.validate(parameters.inner()) {
            Ok(()) => Ok(()),
            Err(error) => Err(ToolError::validation(format!(
                "Parameter validation failed: {error}"
            ))),
        }
    }
}

/// Tool argument wrapper with typed accessors.
#[derive(Debug, Clone)]
pub struct ToolParameters {
    inner: serde_json::Value,
}

impl ToolParameters {
    pub fn new(value: serde_json::Value) -> Self {
        Self { inner: value }
    }

    pub fn empty() -> Self {
        Self {
            inner: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    pub fn inner(&self) -> &serde_json::Value {
        &self.inner
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let value = self
            .inner
            .get(key)
            .ok_or_else(|| ToolError::invalid_field(key, "Parameter not found"))?;
        serde_json::from_value(value.clone())
            .map_err(|_| ToolError::invalid_field(key, "Invalid parameter type"))
    }

    pub fn get_optional<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.inner.get(key) {
            Some(value) if !value.is_null() => Ok(Some(
                serde_json::from_value(value.clone())
                    .map_err(|_| ToolError::invalid_field(key, "Invalid parameter type"))?,
            )),
            _ => Ok(None),
        }
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get(key)
    }

    pub fn get_f64(&self, key: &str) -> Result<f64> {
        self.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.get(key).is_some()
    }
}

impl From<serde_json::Value> for ToolParameters {
    fn from(value: serde_json::Value) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for ToolParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// Tool execution result.
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub success: bool,
    pub content: String,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// Schema for a tool that takes no arguments.
pub fn empty_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}
