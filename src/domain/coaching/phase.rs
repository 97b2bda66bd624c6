//! Training phases within a session.
//!
//! The phase is the single source of truth for behavior dispatch: it decides
//! which persona is simulated, which prompts are built, and which outbound
//! messages a trainee turn produces.

use serde::{Deserialize, Serialize};

/// The current phase of a training session.
///
/// The machine cycles indefinitely:
/// `AwaitingStart` → `DoctorInteraction` → (`FinalSummary`) → `AwaitingStart`.
/// `FinalSummary` is transient - the coordinator returns to `AwaitingStart`
/// on the next message after entering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingPhase {
    /// Waiting for a start request naming a drug and a specialty.
    AwaitingStart,

    /// Active role-play: doctor lines and coach critiques per trainee turn.
    DoctorInteraction,

    /// Summary emitted; any further message resets the session.
    FinalSummary,
}

impl TrainingPhase {
    /// Returns a short label for the phase, suitable for logs and UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AwaitingStart => "awaiting_start",
            Self::DoctorInteraction => "doctor_interaction",
            Self::FinalSummary => "final_summary",
        }
    }

    /// Returns true if a doctor persona must be present in this phase.
    pub fn requires_persona(&self) -> bool {
        matches!(self, Self::DoctorInteraction | Self::FinalSummary)
    }

    /// Returns all valid next phases from this phase.
    pub fn valid_next_phases(&self) -> Vec<Self> {
        match self {
            Self::AwaitingStart => vec![Self::AwaitingStart, Self::DoctorInteraction],
            Self::DoctorInteraction => {
                vec![Self::DoctorInteraction, Self::FinalSummary, Self::AwaitingStart]
            }
            Self::FinalSummary => vec![Self::AwaitingStart],
        }
    }

    /// Returns true if transition to the target phase is valid.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_next_phases().contains(target)
    }
}

impl Default for TrainingPhase {
    fn default() -> Self {
        Self::AwaitingStart
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_phase_is_awaiting_start() {
        assert_eq!(TrainingPhase::default(), TrainingPhase::AwaitingStart);
    }

    #[test]
    fn serializes_to_snake_case() {
        let json = serde_json::to_string(&TrainingPhase::DoctorInteraction).unwrap();
        assert_eq!(json, "\"doctor_interaction\"");
    }

    #[test]
    fn only_active_phases_require_persona() {
        assert!(!TrainingPhase::AwaitingStart.requires_persona());
        assert!(TrainingPhase::DoctorInteraction.requires_persona());
        assert!(TrainingPhase::FinalSummary.requires_persona());
    }

    #[test]
    fn awaiting_start_cannot_jump_to_summary() {
        let phase = TrainingPhase::AwaitingStart;
        assert!(phase.can_transition_to(&TrainingPhase::DoctorInteraction));
        assert!(!phase.can_transition_to(&TrainingPhase::FinalSummary));
    }

    #[test]
    fn interaction_can_loop_end_or_reset() {
        let phase = TrainingPhase::DoctorInteraction;
        assert!(phase.can_transition_to(&TrainingPhase::DoctorInteraction));
        assert!(phase.can_transition_to(&TrainingPhase::FinalSummary));
        assert!(phase.can_transition_to(&TrainingPhase::AwaitingStart));
    }

    #[test]
    fn summary_only_resets() {
        let phase = TrainingPhase::FinalSummary;
        assert_eq!(phase.valid_next_phases(), vec![TrainingPhase::AwaitingStart]);
    }
}
