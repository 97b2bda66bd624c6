//! Objection tool - static lookup of common objections and coaching hints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ToolOutput;

/// Objection domain a doctor concern falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectionTopic {
    Efficacy,
    Safety,
    Cost,
    Convenience,
}

impl ObjectionTopic {
    /// Returns the topic as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Efficacy => "efficacy",
            Self::Safety => "safety",
            Self::Cost => "cost",
            Self::Convenience => "convenience",
        }
    }
}

impl fmt::Display for ObjectionTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ObjectionTopic {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "efficacy" => Ok(Self::Efficacy),
            "safety" => Ok(Self::Safety),
            "cost" => Ok(Self::Cost),
            "convenience" => Ok(Self::Convenience),
            _ => Err(()),
        }
    }
}

/// (objection, coaching hint) pairs for a known topic.
fn objections_for(topic: ObjectionTopic) -> &'static [(&'static str, &'static str)] {
    match topic {
        ObjectionTopic::Efficacy => &[
            (
                "这个药真的有效吗？",
                "引用临床试验数据，说明药物的有效率和起效时间",
            ),
            (
                "和其他药物相比效果如何？",
                "对比研究结果，突出药物的独特优势",
            ),
        ],
        ObjectionTopic::Safety => &[
            (
                "这个药有什么副作用？",
                "诚实告知常见副作用，强调安全监测和管理措施",
            ),
            ("长期使用安全吗？", "提供长期安全性数据，说明监测方案"),
        ],
        ObjectionTopic::Cost => &[(
            "这个药太贵了",
            "从性价比角度分析，提及可能的医保政策或患者援助项目",
        )],
        ObjectionTopic::Convenience => &[(
            "用药方式太复杂",
            "详细说明用药方法，提供简化的用药指导",
        )],
    }
}

/// Lists common objections and coaching hints for a drug and topic.
///
/// `topic` is accepted as a raw string so engine-originated calls with an
/// unknown topic degrade to a single generic (objection, hint) pair that
/// references the drug and topic verbatim.
pub fn objection_tool(drug: &str, topic: &str) -> ToolOutput {
    let pairs: Vec<(String, String)> = match topic.parse::<ObjectionTopic>() {
        Ok(known) => objections_for(known)
            .iter()
            .map(|(o, h)| (o.to_string(), h.to_string()))
            .collect(),
        Err(()) => vec![(
            format!("关于{drug}的{topic}方面的疑虑"),
            "提供专业、准确的信息回应".to_string(),
        )],
    };

    let mut lines = vec![format!("药品：{drug} | 话题：{topic}\n")];
    for (i, (objection, hint)) in pairs.iter().enumerate() {
        lines.push(format!("{}. 异议：{objection}", i + 1));
        lines.push(format!("   应对要点：{hint}\n"));
    }

    ToolOutput::success(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_returns_the_single_predefined_pair() {
        let output = objection_tool("DrugX", "cost");
        assert!(output.is_success());

        let text = output.joined_text();
        assert!(text.contains("药品：DrugX | 话题：cost"));
        assert!(text.contains("1. 异议：这个药太贵了"));
        assert!(text.contains("患者援助项目"));
        // Only one pair for cost
        assert!(!text.contains("2. 异议"));
    }

    #[test]
    fn efficacy_returns_two_pairs() {
        let output = objection_tool("DrugX", "efficacy");
        let text = output.joined_text();
        assert!(text.contains("1. 异议：这个药真的有效吗？"));
        assert!(text.contains("2. 异议：和其他药物相比效果如何？"));
    }

    #[test]
    fn unknown_topic_falls_back_to_generic_pair() {
        let output = objection_tool("DrugX", "logistics");
        assert!(output.is_success());

        let text = output.joined_text();
        assert!(text.contains("关于DrugX的logistics方面的疑虑"));
        assert!(text.contains("提供专业、准确的信息回应"));
    }

    #[test]
    fn topic_parses_from_lowercase() {
        assert_eq!("safety".parse::<ObjectionTopic>(), Ok(ObjectionTopic::Safety));
        assert!("SAFETY".parse::<ObjectionTopic>().is_err());
    }

    #[test]
    fn topic_displays_lowercase() {
        assert_eq!(ObjectionTopic::Convenience.to_string(), "convenience");
    }
}
