//! Tool Registry - named set of training tools with schema'd definitions.
//!
//! The registry dispatches tool calls by name, validating structured
//! arguments before execution. Failures surface as `{status: error}` outputs,
//! never as panics - the coordinator treats them as non-fatal tool results.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use super::{eval_tool, objection_tool, scenario_tool, ScenarioParams, ToolCall, ToolDefinition, ToolOutput};

#[derive(Debug, Deserialize)]
struct ObjectionParams {
    drug: String,
    topic: String,
}

#[derive(Debug, Deserialize)]
struct EvalParams {
    #[serde(rename = "repUtterance")]
    rep_utterance: String,
    #[serde(default)]
    context: String,
}

/// Registry of the three training tools.
///
/// Tools are callable directly (typed functions in this module) or through
/// [`ToolRegistry::dispatch`] when the completion engine requests one by name.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    definitions: HashMap<String, ToolDefinition>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Creates a registry with the scenario, objection, and eval tools.
    pub fn new() -> Self {
        let mut definitions = HashMap::new();

        let scenario = ToolDefinition::simple("scenario_tool", "生成医生人设 + 场景开场白")
            .with_parameter("drug", "string", "药品名称", true)
            .with_parameter("specialty", "string", "医生专科", true)
            .with_enum_parameter(
                "level",
                &["basic", "intermediate", "advanced"],
                "医生级别，默认为 basic",
                false,
            )
            .with_enum_parameter("lang", &["zh", "en"], "语言，默认为 zh", false);
        definitions.insert(scenario.name().to_string(), scenario);

        let objection = ToolDefinition::simple("objection_tool", "给定药品，列出常见异议与要点提示")
            .with_parameter("drug", "string", "药品名称", true)
            .with_enum_parameter(
                "topic",
                &["efficacy", "safety", "cost", "convenience"],
                "关注话题",
                true,
            );
        definitions.insert(objection.name().to_string(), objection);

        let eval = ToolDefinition::simple(
            "eval_tool",
            "打分药代回答的准确性 + 合规性，并给简短改进建议",
        )
        .with_parameter("repUtterance", "string", "药代的回答内容", true)
        .with_parameter("context", "string", "对话上下文", false);
        definitions.insert(eval.name().to_string(), eval);

        Self { definitions }
    }

    /// Executes a tool call by name.
    ///
    /// Unknown tools and invalid arguments produce error-status outputs.
    pub fn dispatch(&self, call: &ToolCall) -> ToolOutput {
        match call.name.as_str() {
            "scenario_tool" => match ScenarioParams::deserialize(&call.arguments) {
                Ok(params) => scenario_tool(&params),
                Err(err) => ToolOutput::error(format!("scenario_tool 参数无效: {err}")),
            },
            "objection_tool" => match ObjectionParams::deserialize(&call.arguments) {
                Ok(params) => objection_tool(&params.drug, &params.topic),
                Err(err) => ToolOutput::error(format!("objection_tool 参数无效: {err}")),
            },
            "eval_tool" => match EvalParams::deserialize(&call.arguments) {
                Ok(params) => eval_tool(&params.rep_utterance, &params.context),
                Err(err) => ToolOutput::error(format!("eval_tool 参数无效: {err}")),
            },
            unknown => ToolOutput::error(format!("未知工具: {unknown}")),
        }
    }

    /// Returns true if a tool with this name is registered.
    pub fn has_tool(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Gets a tool definition by name.
    pub fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.definitions.get(name)
    }

    /// Returns the number of registered tools.
    pub fn tool_count(&self) -> usize {
        self.definitions.len()
    }

    /// Converts all definitions to OpenAI function-calling format.
    pub fn to_openai_tools(&self) -> Vec<Value> {
        self.definitions
            .values()
            .map(|def| def.to_openai_format())
            .collect()
    }
}
