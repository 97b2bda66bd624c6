//! Completion Engine Port - interface for language-model integrations.
//!
//! This port abstracts the prompt-to-completion call so the coordinator can
//! generate doctor lines, coach feedback, and summaries without coupling to a
//! specific provider.
//!
//! # Design
//!
//! - Provider-agnostic message and role format
//! - Declared tool capabilities travel with the request; a reply may carry a
//!   tool-invocation request instead of final text
//! - Error taxonomy for the common failure modes (rate limits, network,
//!   authentication); every coordinator call site catches these and converts
//!   them to a tagged outbound message
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct MyEngine;
//!
//! #[async_trait]
//! impl CompletionEngine for MyEngine {
//!     async fn complete(&self, request: CompletionRequest) -> Result<Completion, CompletionError> {
//!         Ok(Completion::text("你好，我是李伟主任。"))
//!     }
//!
//!     fn engine_info(&self) -> EngineInfo {
//!         EngineInfo::new("my-engine", "my-model")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::tools::ToolCall;

/// Port for language-model completion calls.
///
/// Implementations connect to external model services and translate between
/// the provider-specific API and these domain shapes.
#[async_trait]
pub trait CompletionEngine: Send + Sync {
    /// Generates a single completion.
    ///
    /// Must fail cleanly with a descriptive [`CompletionError`] on any
    /// failure (network, quota, malformed response).
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, CompletionError>;

    /// Returns engine information (name, model).
    fn engine_info(&self) -> EngineInfo;
}

/// Role of a message sender in an engine exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineRole {
    /// System instructions (guides model behavior).
    System,
    /// User input.
    User,
    /// Assistant (model) response.
    Assistant,
    /// Tool execution result fed back into the exchange.
    Tool,
}

/// A message in an engine exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMessage {
    /// Who sent this message.
    pub role: EngineRole,
    /// Message content.
    pub content: String,
    /// Tool name, for `Tool`-role messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EngineMessage {
    /// Creates a new message.
    pub fn new(role: EngineRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(EngineRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(EngineRole::Assistant, content)
    }

    /// Creates a tool-result message.
    pub fn tool_result(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: EngineRole::Tool,
            content: content.into(),
            name: Some(name.into()),
        }
    }
}

/// Request for an engine completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Exchange messages (prompt plus any tool round-trip turns).
    pub messages: Vec<EngineMessage>,
    /// System prompt framing the model's behavior.
    pub system_prompt: Option<String>,
    /// Declared tool capabilities, in OpenAI function format.
    pub tools: Vec<Value>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Temperature for response randomness.
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Creates a request with a single user prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![EngineMessage::user(prompt)],
            system_prompt: None,
            tools: Vec::new(),
            max_tokens: None,
            temperature: None,
        }
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Declares tool capabilities for this request.
    pub fn with_tools(mut self, tools: Vec<Value>) -> Self {
        self.tools = tools;
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Appends an assistant turn (used during tool round-trips).
    pub fn push_assistant_turn(&mut self, content: impl Into<String>) {
        self.messages.push(EngineMessage::assistant(content));
    }

    /// Appends a tool result turn (used during tool round-trips).
    pub fn push_tool_result(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.messages.push(EngineMessage::tool_result(name, content));
    }
}

/// Reply from an engine completion.
///
/// Carries either final text or a request to invoke a declared tool; the
/// caller executes the tool and re-invokes with the result appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Generated content (may be empty when a tool is requested).
    pub content: String,
    /// Tool the model asked the host to execute, if any.
    pub tool_request: Option<ToolCall>,
}

impl Completion {
    /// Creates a text-only completion.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_request: None,
        }
    }

    /// Creates a completion that requests a tool invocation.
    pub fn tool_request(call: ToolCall) -> Self {
        Self {
            content: String::new(),
            tool_request: Some(call),
        }
    }

    /// Returns true if the model requested a tool invocation.
    pub fn wants_tool(&self) -> bool {
        self.tool_request.is_some()
    }
}

/// Engine information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineInfo {
    /// Engine name (e.g., "openai-compatible", "mock").
    pub name: String,
    /// Model identifier.
    pub model: String,
}

impl EngineInfo {
    /// Creates new engine info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Completion engine errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CompletionError {
    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("engine unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Tool round-trip exceeded the iteration guard.
    #[error("tool round-trip exceeded {rounds} rounds")]
    ToolLoopExceeded {
        /// Configured maximum rounds.
        rounds: usize,
    },
}

impl CompletionError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CompletionError::RateLimited { .. }
                | CompletionError::Unavailable { .. }
                | CompletionError::Network(_)
                | CompletionError::Timeout { .. }
        )
    }
}
