//! Scenario tool - deterministic persona and opening-line generation.
//!
//! Pure string construction from language-specific templates. No randomness,
//! no external calls.

use serde::{Deserialize, Serialize};

use super::ToolOutput;

/// Difficulty level of the simulated doctor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioLevel {
    #[default]
    Basic,
    Intermediate,
    Advanced,
}

impl ScenarioLevel {
    /// Returns the level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

/// Output language of the generated scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioLang {
    #[default]
    Zh,
    En,
}

/// Structured input for [`scenario_tool`].
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioParams {
    pub drug: String,
    pub specialty: String,
    #[serde(default)]
    pub level: ScenarioLevel,
    #[serde(default)]
    pub lang: ScenarioLang,
}

/// Formats a doctor persona description and opening line for a scenario.
pub fn scenario_tool(params: &ScenarioParams) -> ToolOutput {
    let (persona, opening_line) = match params.lang {
        ScenarioLang::Zh => (
            format!(
                "您是一位{}科的{}级医生，对{}有深入了解，善于与患者沟通，专业且耐心。",
                params.specialty,
                params.level.as_str(),
                params.drug
            ),
            format!(
                "您好，我是{}科医生。今天想和您聊聊关于{}的一些情况，您有什么想了解的吗？",
                params.specialty, params.drug
            ),
        ),
        ScenarioLang::En => (
            format!(
                "You are a {}-level doctor in {}, with deep knowledge of {}, good at communicating with patients, professional and patient.",
                params.level.as_str(),
                params.specialty,
                params.drug
            ),
            format!(
                "Hello, I'm a doctor in {}. Today I'd like to talk with you about {}. What would you like to know?",
                params.specialty, params.drug
            ),
        ),
    };

    ToolOutput::success(format!("医生人设：{persona}\n\n开场白：{opening_line}"))
}
