//! Tool definition, call, and output value objects.
//!
//! Definitions carry a JSON Schema for parameters so tools can be declared
//! to a completion engine as callable capabilities. Calls and outputs are the
//! wire-agnostic shapes exchanged between the coordinator, the registry, and
//! the engine's tool round-trip.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Declared tool capability: name, description, and parameter schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    name: String,
    description: String,
    parameters: Value,
}

impl ToolDefinition {
    /// Creates a definition with an empty parameter schema.
    pub fn simple(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: json!({
                "type": "object",
                "properties": {},
                "required": [],
            }),
        }
    }

    /// Adds a parameter to the schema.
    pub fn with_parameter(
        mut self,
        name: &str,
        param_type: &str,
        description: &str,
        required: bool,
    ) -> Self {
        if let Some(props) = self
            .parameters
            .get_mut("properties")
            .and_then(Value::as_object_mut)
        {
            props.insert(
                name.to_string(),
                json!({ "type": param_type, "description": description }),
            );
        }
        if required {
            if let Some(req) = self
                .parameters
                .get_mut("required")
                .and_then(Value::as_array_mut)
            {
                req.push(Value::String(name.to_string()));
            }
        }
        self
    }

    /// Adds an enum-constrained string parameter to the schema.
    pub fn with_enum_parameter(
        mut self,
        name: &str,
        values: &[&str],
        description: &str,
        required: bool,
    ) -> Self {
        if let Some(props) = self
            .parameters
            .get_mut("properties")
            .and_then(Value::as_object_mut)
        {
            props.insert(
                name.to_string(),
                json!({ "type": "string", "enum": values, "description": description }),
            );
        }
        if required {
            if let Some(req) = self
                .parameters
                .get_mut("required")
                .and_then(Value::as_array_mut)
            {
                req.push(Value::String(name.to_string()));
            }
        }
        self
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameter JSON Schema.
    pub fn parameters_schema(&self) -> &Value {
        &self.parameters
    }

    /// Converts the definition to OpenAI function-calling format.
    pub fn to_openai_format(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// A request from the engine (or the coordinator) to invoke a named tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to invoke.
    pub name: String,
    /// Structured arguments as a JSON object.
    pub arguments: Value,
}

impl ToolCall {
    /// Creates a new tool call.
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Outcome status of a tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Error,
}

/// A text block within a tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolContent {
    pub text: String,
}

/// Structured result of a tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub status: ToolStatus,
    pub content: Vec<ToolContent>,
}

impl ToolOutput {
    /// Creates a successful output with a single text block.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Success,
            content: vec![ToolContent { text: text.into() }],
        }
    }

    /// Creates an error output with a single text block.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Error,
            content: vec![ToolContent { text: text.into() }],
        }
    }

    /// Returns true if the tool succeeded.
    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }

    /// Joins all content blocks into a single string.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
