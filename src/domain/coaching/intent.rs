//! Start-intent classification.
//!
//! Intent detection is a best-effort keyword classifier kept behind a trait,
//! so the state machine only consumes the parsed result and stays
//! keyword-agnostic. The default classifier mirrors the original zh/en
//! keyword sets; swap in another implementation for other locales.

use serde::{Deserialize, Serialize};

use crate::domain::tools::{ScenarioLang, ScenarioLevel};

/// Drug tokens the persona directory recognizes.
const KNOWN_DRUGS: &[(&str, &str)] = &[("semaglutide", "semaglutide"), ("司美格鲁肽", "semaglutide")];

/// Specialty tokens the persona directory recognizes.
const KNOWN_SPECIALTIES: &[(&str, &str)] =
    &[("endocrinology", "endocrinology"), ("内分泌", "endocrinology")];

/// A satisfied start request: the trainee named a drug, a specialty, and a
/// start trigger in one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartIntent {
    /// Canonical drug token, when a recognized drug was named.
    pub drug: Option<String>,
    /// Canonical specialty token, when a recognized specialty was named.
    pub specialty: Option<String>,
    /// Requested difficulty, defaulting to basic.
    pub level: ScenarioLevel,
    /// Requested scenario language, defaulting to Chinese.
    pub lang: ScenarioLang,
}

/// Pluggable start-intent classifier.
pub trait StartClassifier: Send + Sync {
    /// Returns the parsed intent when the utterance satisfies all start
    /// conditions, `None` otherwise.
    fn classify(&self, utterance: &str) -> Option<StartIntent>;
}

/// Default classifier: requires a drug keyword, a specialty keyword, and a
/// start trigger ("start" / "开始", case-insensitive), all in one utterance.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordStartClassifier;

impl StartClassifier for KeywordStartClassifier {
    fn classify(&self, utterance: &str) -> Option<StartIntent> {
        let lower = utterance.to_lowercase();

        let has_drug = utterance.contains("药品") || lower.contains("drug");
        let has_specialty = utterance.contains("科室")
            || lower.contains("specialty")
            || lower.contains("department");
        let has_start = lower.contains("start") || utterance.contains("开始");

        if !(has_drug && has_specialty && has_start) {
            return None;
        }

        let drug = KNOWN_DRUGS
            .iter()
            .find(|(token, _)| lower.contains(token))
            .map(|(_, canonical)| canonical.to_string());
        let specialty = KNOWN_SPECIALTIES
            .iter()
            .find(|(token, _)| lower.contains(token))
            .map(|(_, canonical)| canonical.to_string());

        let level = if lower.contains("advanced") || utterance.contains("高级") {
            ScenarioLevel::Advanced
        } else if lower.contains("intermediate") || utterance.contains("中级") {
            ScenarioLevel::Intermediate
        } else {
            ScenarioLevel::Basic
        };
        let lang = if lower.contains("english") || utterance.contains("英文") {
            ScenarioLang::En
        } else {
            ScenarioLang::Zh
        };

        Some(StartIntent {
            drug,
            specialty,
            level,
            lang,
        })
    }
}

/// Returns true if the utterance carries the end-training trigger phrase.
pub fn is_end_training(utterance: &str) -> bool {
    utterance.contains("结束训练") || utterance.to_lowercase().contains("end training")
}
