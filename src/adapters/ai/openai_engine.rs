//! OpenAI-compatible chat-completions engine.
//!
//! Speaks the `/chat/completions` wire format, which DeepSeek, SiliconFlow,
//! and other compatible gateways also serve. Declared tools travel in the
//! request as OpenAI function definitions; a reply may carry a tool call
//! instead of final text, which the coordinator executes and feeds back.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::EngineConfig;
use crate::ports::{
    Completion, CompletionEngine, CompletionError, CompletionRequest, EngineInfo, EngineMessage,
    EngineRole,
};
use crate::domain::tools::ToolCall;

/// Engine adapter for OpenAI-compatible chat-completion APIs.
pub struct OpenAiEngine {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout_secs: u32,
}

impl OpenAiEngine {
    /// Builds an engine from configuration.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the HTTP client cannot be constructed
    pub fn new(config: &EngineConfig) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| CompletionError::InvalidRequest(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model_id.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_body(&self, request: &CompletionRequest) -> Value {
        let mut messages: Vec<Value> = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system_prompt) = &request.system_prompt {
            messages.push(json!({ "role": "system", "content": system_prompt }));
        }
        for message in &request.messages {
            messages.push(wire_message(message));
        }

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": request.max_tokens.unwrap_or(self.max_tokens),
            "temperature": request.temperature.unwrap_or(self.temperature),
        });
        if !request.tools.is_empty() {
            body["tools"] = Value::Array(request.tools.clone());
        }
        body
    }

    fn map_request_error(&self, err: reqwest::Error) -> CompletionError {
        if err.is_timeout() {
            CompletionError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            CompletionError::network(err.to_string())
        }
    }
}

fn wire_message(message: &EngineMessage) -> Value {
    match message.role {
        EngineRole::Tool => json!({
            "role": "tool",
            "name": message.name,
            "content": message.content,
        }),
        role => json!({ "role": role, "content": message.content }),
    }
}

fn map_status(status: reqwest::StatusCode, body: &str) -> CompletionError {
    match status.as_u16() {
        401 | 403 => CompletionError::AuthenticationFailed,
        429 => CompletionError::rate_limited(30),
        400 => CompletionError::InvalidRequest(body.to_string()),
        _ => CompletionError::unavailable(format!("HTTP {status}: {body}")),
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    /// JSON-encoded argument object, per the wire format.
    arguments: String,
}

fn parse_completion(response: ChatResponse) -> Result<Completion, CompletionError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::parse("response carried no choices"))?;

    let content = choice.message.content.unwrap_or_default();

    if let Some(wire_call) = choice.message.tool_calls.into_iter().next() {
        let arguments: Value = serde_json::from_str(&wire_call.function.arguments)
            .map_err(|err| CompletionError::parse(format!("tool arguments: {err}")))?;
        return Ok(Completion {
            content,
            tool_request: Some(ToolCall::new(wire_call.function.name, arguments)),
        });
    }

    Ok(Completion::text(content))
}

#[async_trait]
impl CompletionEngine for OpenAiEngine {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, CompletionError> {
        let body = self.build_body(&request);

        tracing::debug!(
            model = %self.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|err| self.map_request_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "completion request rejected");
            return Err(map_status(status, &body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| CompletionError::parse(err.to_string()))?;

        parse_completion(parsed)
    }

    fn engine_info(&self) -> EngineInfo {
        EngineInfo::new("openai-compatible", &self.model)
    }
}
