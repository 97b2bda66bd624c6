//! Doctor persona - the simulated counterpart in a role-play session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;

/// Behavioral framing used when no persona has been established.
pub(crate) const GENERIC_SYSTEM_PROMPT: &str = "你是一位资深临床医生。请以专业、有时略带挑战性的语气与医药代表互动。确保你的回答符合医学专业知识和常见的临床情景。";

/// A simulated doctor persona, exclusively owned by one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorPersona {
    /// Display name, e.g. "李伟".
    pub name: String,
    /// Clinical specialty, e.g. "内分泌科".
    pub specialty: String,
    /// The persona's first line when the role-play begins.
    pub opening_line: String,
    /// Optional profile surfaced to the trainee as a system notice.
    pub characteristics: Option<String>,
}

impl DoctorPersona {
    /// Creates a persona, validating the identity fields.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if name, specialty, or opening line is empty
    pub fn new(
        name: impl Into<String>,
        specialty: impl Into<String>,
        opening_line: impl Into<String>,
        characteristics: Option<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let specialty = specialty.into();
        let opening_line = opening_line.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("name", "persona name cannot be empty"));
        }
        if specialty.trim().is_empty() {
            return Err(DomainError::validation(
                "specialty",
                "persona specialty cannot be empty",
            ));
        }
        if opening_line.trim().is_empty() {
            return Err(DomainError::validation(
                "opening_line",
                "persona opening line cannot be empty",
            ));
        }

        Ok(Self {
            name,
            specialty,
            opening_line,
            characteristics,
        })
    }

    /// Resolves a persona for a recognized (drug, specialty) pair.
    ///
    /// Recognized combinations map to a scripted persona; anything else falls
    /// back to a generic default. Deterministic - no randomness, no calls.
    pub fn for_scenario(drug: Option<&str>, specialty: Option<&str>) -> Self {
        match (drug, specialty) {
            (Some("semaglutide"), Some("endocrinology")) => Self {
                name: "李伟".to_string(),
                specialty: "内分泌科".to_string(),
                opening_line: "“你好，我是李伟主任，最近门诊里肥胖合并 2 型糖尿病的患者越来越多。你们司美格鲁肽有哪些新版数据？”".to_string(),
                characteristics: Some("男·45 岁·主任医师·周处方量≈25 支".to_string()),
            },
            _ => Self {
                name: "王医生".to_string(),
                specialty: "相关科室".to_string(),
                opening_line: "“你好，关于你提到的药品，请详细介绍一下数据和证据。”".to_string(),
                characteristics: Some("经验丰富，关注药物的实际临床价值。".to_string()),
            },
        }
    }

    /// Derives the persona-specific system prompt for doctor-line generation.
    ///
    /// Pure function of persona state: identity sentence, optional
    /// characteristics sentence, and a closing instruction to stay natural
    /// and professional.
    pub fn system_prompt(&self) -> String {
        let mut prompt = format!(
            "你是一位名叫 {} 的{}医生。你的任务是与医药代表进行角色扮演对话。请根据你的专业背景和当前对话情境进行回应。",
            self.name, self.specialty
        );
        if let Some(characteristics) = &self.characteristics {
            prompt.push_str(&format!(" 你的背景信息：{characteristics}。"));
        }
        prompt.push_str(" 请确保你的发言自然、专业，并能推动对话有效进行。");
        prompt
    }
}
