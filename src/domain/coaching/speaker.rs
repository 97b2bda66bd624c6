//! Speaker discrimination and outbound messages.
//!
//! The coordinator returns tagged variants rather than prefix-encoded
//! strings, so gateways match on the discriminator instead of parsing text.
//! `Display` still produces the legacy textual tags ("Doctor 李伟", "Coach")
//! used in transcripts and prompt construction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who a message is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "name", rename_all = "snake_case")]
pub enum Speaker {
    /// The trainee rep.
    User,
    /// The simulated doctor persona, carrying the persona's display name.
    Doctor(String),
    /// The automated coaching critique.
    Coach,
    /// Coordinator notices and instructions.
    System,
    /// The end-of-training summary report.
    Summary,
}

impl Speaker {
    /// Creates a doctor speaker for a persona name.
    pub fn doctor(name: impl Into<String>) -> Self {
        Self::Doctor(name.into())
    }

    /// Returns true for any doctor speaker, regardless of persona name.
    pub fn is_doctor(&self) -> bool {
        matches!(self, Self::Doctor(_))
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "User"),
            Self::Doctor(name) => write!(f, "Doctor {name}"),
            Self::Coach => write!(f, "Coach"),
            Self::System => write!(f, "System"),
            Self::Summary => write!(f, "Summary"),
        }
    }
}

/// A tagged message produced by the coordinator for the caller to relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Who the message is attributed to.
    pub speaker: Speaker,
    /// Message body.
    pub body: String,
}

impl OutboundMessage {
    /// Creates a message for any speaker.
    pub fn new(speaker: Speaker, body: impl Into<String>) -> Self {
        Self {
            speaker,
            body: body.into(),
        }
    }

    /// Creates a system notice.
    pub fn system(body: impl Into<String>) -> Self {
        Self::new(Speaker::System, body)
    }

    /// Creates a coach message.
    pub fn coach(body: impl Into<String>) -> Self {
        Self::new(Speaker::Coach, body)
    }

    /// Creates a summary message.
    pub fn summary(body: impl Into<String>) -> Self {
        Self::new(Speaker::Summary, body)
    }

    /// Creates a doctor message.
    pub fn doctor(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(Speaker::doctor(name), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctor_display_includes_name() {
        assert_eq!(Speaker::doctor("李伟").to_string(), "Doctor 李伟");
    }

    #[test]
    fn plain_speakers_display_as_tags() {
        assert_eq!(Speaker::User.to_string(), "User");
        assert_eq!(Speaker::Coach.to_string(), "Coach");
        assert_eq!(Speaker::System.to_string(), "System");
        assert_eq!(Speaker::Summary.to_string(), "Summary");
    }

    #[test]
    fn is_doctor_ignores_name() {
        assert!(Speaker::doctor("王医生").is_doctor());
        assert!(!Speaker::Coach.is_doctor());
    }

    #[test]
    fn serializes_with_role_discriminator() {
        let json = serde_json::to_value(Speaker::doctor("李伟")).unwrap();
        assert_eq!(json["role"], "doctor");
        assert_eq!(json["name"], "李伟");

        let json = serde_json::to_value(Speaker::Coach).unwrap();
        assert_eq!(json["role"], "coach");
    }

    #[test]
    fn outbound_message_constructors_set_speaker() {
        assert_eq!(OutboundMessage::system("hi").speaker, Speaker::System);
        assert_eq!(OutboundMessage::coach("hi").speaker, Speaker::Coach);
        assert_eq!(OutboundMessage::summary("hi").speaker, Speaker::Summary);
        assert!(OutboundMessage::doctor("李伟", "hi").speaker.is_doctor());
    }
}
