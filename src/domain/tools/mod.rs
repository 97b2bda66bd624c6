//! Training tools - deterministic helpers callable by the coordinator or by
//! the completion engine through declared tool capabilities.
//!
//! Each tool is a side-effect-free function taking structured input and
//! returning a [`ToolOutput`] of shape `{status, content: [{text}]}`.

mod definition;
mod evaluation;
mod objection;
mod registry;
mod scenario;

pub use definition::{ToolCall, ToolContent, ToolDefinition, ToolOutput, ToolStatus};
pub use evaluation::{eval_tool, score_utterance};
pub use objection::{objection_tool, ObjectionTopic};
pub use registry::ToolRegistry;
pub use scenario::{scenario_tool, ScenarioLang, ScenarioLevel, ScenarioParams};
