//! Mock completion engine for tests and offline runs.
//!
//! Scripted replies are consumed in FIFO order; every request is logged so
//! tests can assert on prompts, system prompts, and tool round-trip turns.
//! When the queue runs dry the engine falls back to a fixed reply, which
//! also makes it usable as an offline stand-in for the real engine.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::tools::ToolCall;
use crate::ports::{Completion, CompletionEngine, CompletionError, CompletionRequest, EngineInfo};

const FALLBACK_REPLY: &str = "（模拟回复）好的，我们继续。";

/// One scripted engine reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Final text.
    Text(String),
    /// A request to invoke a tool.
    ToolRequest(ToolCall),
    /// A failure.
    Error(CompletionError),
}

/// Completion engine that replays scripted replies.
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockEngine {
    /// Creates a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a text reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Text(text.into()));
        self
    }

    /// Queues a tool-invocation request.
    pub fn with_tool_request(self, call: ToolCall) -> Self {
        self.push(MockReply::ToolRequest(call));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: CompletionError) -> Self {
        self.push(MockReply::Error(error));
        self
    }

    fn push(&self, reply: MockReply) {
        self.replies
            .lock()
            .expect("mock reply queue lock poisoned")
            .push_back(reply);
    }

    /// Returns a snapshot of every request received so far, in order.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls
            .lock()
            .expect("mock call log lock poisoned")
            .clone()
    }

    /// Returns how many requests the engine has received.
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .expect("mock call log lock poisoned")
            .len()
    }
}

#[async_trait]
impl CompletionEngine for MockEngine {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, CompletionError> {
        self.calls
            .lock()
            .expect("mock call log lock poisoned")
            .push(request);

        let reply = self
            .replies
            .lock()
            .expect("mock reply queue lock poisoned")
            .pop_front();

        match reply {
            Some(MockReply::Text(text)) => Ok(Completion::text(text)),
            Some(MockReply::ToolRequest(call)) => Ok(Completion::tool_request(call)),
            Some(MockReply::Error(error)) => Err(error),
            None => Ok(Completion::text(FALLBACK_REPLY)),
        }
    }

    fn engine_info(&self) -> EngineInfo {
        EngineInfo::new("mock", "scripted")
    }
}
