//! Objection cue detection in generated doctor lines.
//!
//! When a doctor line raises a concern in a known objection domain, the
//! coordinator appends a visible marker so the client can surface an
//! objection-handling cue to the trainee.

use crate::domain::tools::ObjectionTopic;

/// Marker appended to an emitted doctor line carrying an objection cue.
pub const OBJECTION_CUE_MARKER: &str = " _ObjectionTool_";

const COST_TERMS: &[&str] = &["价格", "费用", "太贵", "price", "cost"];
const EFFICACY_TERMS: &[&str] = &["效果", "疗效", "efficacy"];
const SAFETY_TERMS: &[&str] = &["副作用", "不良反应", "side effect"];
const CONVENIENCE_TERMS: &[&str] = &["依从性", "adherence"];

fn contains_any(line: &str, terms: &[&str]) -> bool {
    let lower = line.to_lowercase();
    terms.iter().any(|term| lower.contains(term))
}

/// Scans a doctor line for objection-domain keywords.
///
/// Returns the first matched topic in a fixed domain order, or `None` when
/// the line carries no objection cue.
pub fn detect_objection_topic(line: &str) -> Option<ObjectionTopic> {
    if contains_any(line, COST_TERMS) {
        Some(ObjectionTopic::Cost)
    } else if contains_any(line, EFFICACY_TERMS) {
        Some(ObjectionTopic::Efficacy)
    } else if contains_any(line, SAFETY_TERMS) {
        Some(ObjectionTopic::Safety)
    } else if contains_any(line, CONVENIENCE_TERMS) {
        Some(ObjectionTopic::Convenience)
    } else {
        None
    }
}
