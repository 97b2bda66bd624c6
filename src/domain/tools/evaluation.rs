//! Evaluation tool - explainable additive scoring of a rep utterance.
//!
//! Scores accuracy, compliance, and professionalism with a fixed rule set
//! rather than a model call, so results are reproducible and auditable.

use super::ToolOutput;

const EVIDENCE_TERMS: &[&str] = &["临床试验", "研究"];
const SAFETY_TERMS: &[&str] = &["副作用", "安全"];
const FORBIDDEN_TERMS: &[&str] = &["一定", "绝对", "包治", "神药"];
const PROFESSIONAL_TERMS: &[&str] = &["适应症", "禁忌症", "药物相互作用", "不良反应"];
const RESEARCH_TERMS: &[&str] = &["临床", "研究", "试验"];

fn contains_any(utterance: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| utterance.contains(term))
}

/// Scores a rep utterance on the additive 0-100 rule.
///
/// Base 70; +10 for length over 50 characters; +10 for citing evidence;
/// +5 for mentioning safety; -20 for absolutist claims; +5 for professional
/// terminology; clamped to [0, 100].
pub fn score_utterance(rep_utterance: &str) -> u8 {
    let mut score: i32 = 70;

    if rep_utterance.chars().count() > 50 {
        score += 10;
    }
    if contains_any(rep_utterance, EVIDENCE_TERMS) {
        score += 10;
    }
    if contains_any(rep_utterance, SAFETY_TERMS) {
        score += 5;
    }
    if contains_any(rep_utterance, FORBIDDEN_TERMS) {
        score -= 20;
    }
    if contains_any(rep_utterance, PROFESSIONAL_TERMS) {
        score += 5;
    }

    score.clamp(0, 100) as u8
}

fn improvement_comments(rep_utterance: &str, score: u8) -> String {
    let mut comments = Vec::new();

    if score < 60 {
        comments.push("回答需要更加专业和准确");
    } else if score < 80 {
        comments.push("可以增加更多循证医学证据");
    } else {
        comments.push("回答质量良好");
    }

    if rep_utterance.chars().count() < 30 {
        comments.push("建议提供更详细的信息");
    }

    if !contains_any(rep_utterance, RESEARCH_TERMS) {
        comments.push("建议引用相关临床研究数据");
    }

    comments[..comments.len().min(2)].join("；")
}

/// Scores a rep utterance and formats the result with improvement comments.
///
/// `context` is accepted for parity with the declared tool schema; the rule
/// set scores the utterance alone.
pub fn eval_tool(rep_utterance: &str, _context: &str) -> ToolOutput {
    let score = score_utterance(rep_utterance);
    let comment = improvement_comments(rep_utterance, score);

    ToolOutput::success(format!("评估结果：\n分数：{score}/100\n改进建议：{comment}"))
}
