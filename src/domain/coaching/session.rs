//! Training session aggregate.
//!
//! One session per trainee conversation, owned by the caller and passed by
//! mutable reference into the coordinator - concurrent calls against the
//! same session are impossible by construction, and independent sessions
//! share no state.
//!
//! # Invariants
//!
//! - `persona` is `Some` exactly when the phase requires one
//!   (`DoctorInteraction` or `FinalSummary`)
//! - the transcript is append-only
//! - phase transitions follow [`TrainingPhase::can_transition_to`]

use crate::domain::foundation::{DomainError, SessionId, Timestamp};

use super::{AudioBuffer, DoctorPersona, Speaker, TrainingPhase, Transcript};

/// A trainee's role-play session: phase, persona, transcript, audio buffer.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    phase: TrainingPhase,
    persona: Option<DoctorPersona>,
    transcript: Transcript,
    audio: AudioBuffer,
    started_at: Timestamp,
}

impl Session {
    /// Creates a fresh session in `AwaitingStart` with no persona.
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            phase: TrainingPhase::AwaitingStart,
            persona: None,
            transcript: Transcript::new(),
            audio: AudioBuffer::new(),
            started_at: Timestamp::now(),
        }
    }

    /// Returns the session id.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the current phase.
    pub fn phase(&self) -> TrainingPhase {
        self.phase
    }

    /// Returns the active persona, if any.
    pub fn persona(&self) -> Option<&DoctorPersona> {
        self.persona.as_ref()
    }

    /// Returns the transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns when the session was created.
    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    /// Appends an utterance to the transcript.
    pub fn record(&mut self, speaker: Speaker, utterance: impl Into<String>) {
        self.transcript.append(speaker, utterance);
    }

    /// Transitions into active role-play with the given persona.
    ///
    /// # Errors
    ///
    /// - `InvalidPhaseTransition` unless the session is in `AwaitingStart`
    pub fn begin_interaction(&mut self, persona: DoctorPersona) -> Result<(), DomainError> {
        if self.phase != TrainingPhase::AwaitingStart {
            return Err(DomainError::invalid_transition(
                self.phase.label(),
                TrainingPhase::DoctorInteraction.label(),
            ));
        }
        self.phase = TrainingPhase::DoctorInteraction;
        self.persona = Some(persona);
        Ok(())
    }

    /// Transitions into `FinalSummary` when the end-training trigger fires.
    ///
    /// # Errors
    ///
    /// - `InvalidPhaseTransition` unless the session is in `DoctorInteraction`
    pub fn enter_final_summary(&mut self) -> Result<(), DomainError> {
        if self.phase != TrainingPhase::DoctorInteraction {
            return Err(DomainError::invalid_transition(
                self.phase.label(),
                TrainingPhase::FinalSummary.label(),
            ));
        }
        self.phase = TrainingPhase::FinalSummary;
        Ok(())
    }

    /// Ends training: back to `AwaitingStart`, persona cleared.
    ///
    /// Valid from any phase (also the defensive reset path), so infallible.
    pub fn complete_training(&mut self) {
        self.phase = TrainingPhase::AwaitingStart;
        self.persona = None;
    }

    /// Resets the session to its initial state, keeping the id.
    ///
    /// Clears phase, persona, transcript, and audio, so a reset session
    /// behaves identically to a freshly constructed one.
    pub fn reset(&mut self) {
        self.phase = TrainingPhase::AwaitingStart;
        self.persona = None;
        self.transcript = Transcript::new();
        self.audio = AudioBuffer::new();
        self.started_at = Timestamp::now();
    }

    /// Buffers a chunk of raw audio for the speech collaborator.
    pub fn push_audio_chunk(&mut self, chunk: Vec<u8>) {
        self.audio.push_chunk(chunk);
    }

    /// Atomically drains the audio buffer for handoff.
    pub fn drain_audio(&mut self) -> Vec<Vec<u8>> {
        self.audio.drain()
    }

    /// Returns the number of buffered audio chunks.
    pub fn buffered_audio_chunks(&self) -> usize {
        self.audio.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona() -> DoctorPersona {
        DoctorPersona::for_scenario(Some("semaglutide"), Some("endocrinology"))
    }

    fn invariant_holds(session: &Session) -> bool {
        session.persona().is_some() == session.phase().requires_persona()
    }

    #[test]
    fn new_session_awaits_start_with_no_persona() {
        let session = Session::new();
        assert_eq!(session.phase(), TrainingPhase::AwaitingStart);
        assert!(session.persona().is_none());
        assert!(session.transcript().is_empty());
        assert!(invariant_holds(&session));
    }

    #[test]
    fn begin_interaction_sets_phase_and_persona() {
        let mut session = Session::new();
        session.begin_interaction(persona()).unwrap();

        assert_eq!(session.phase(), TrainingPhase::DoctorInteraction);
        assert_eq!(session.persona().unwrap().name, "李伟");
        assert!(invariant_holds(&session));
    }

    #[test]
    fn begin_interaction_rejected_when_already_active() {
        let mut session = Session::new();
        session.begin_interaction(persona()).unwrap();

        let err = session.begin_interaction(persona()).unwrap_err();
        assert!(err.to_string().contains("doctor_interaction"));
    }

    #[test]
    fn enter_final_summary_requires_interaction() {
        let mut session = Session::new();
        assert!(session.enter_final_summary().is_err());

        session.begin_interaction(persona()).unwrap();
        session.enter_final_summary().unwrap();
        assert_eq!(session.phase(), TrainingPhase::FinalSummary);
        assert!(invariant_holds(&session));
    }

    #[test]
    fn complete_training_clears_persona_from_any_phase() {
        let mut session = Session::new();
        session.begin_interaction(persona()).unwrap();
        session.enter_final_summary().unwrap();

        session.complete_training();
        assert_eq!(session.phase(), TrainingPhase::AwaitingStart);
        assert!(session.persona().is_none());
        assert!(invariant_holds(&session));
    }

    #[test]
    fn reset_clears_transcript_and_audio_but_keeps_id() {
        let mut session = Session::new();
        let id = session.id();
        session.begin_interaction(persona()).unwrap();
        session.record(Speaker::User, "你好");
        session.push_audio_chunk(vec![1, 2, 3]);

        session.reset();

        assert_eq!(session.id(), id);
        assert_eq!(session.phase(), TrainingPhase::AwaitingStart);
        assert!(session.persona().is_none());
        assert!(session.transcript().is_empty());
        assert_eq!(session.buffered_audio_chunks(), 0);
    }

    #[test]
    fn audio_drain_is_atomic() {
        let mut session = Session::new();
        session.push_audio_chunk(vec![1]);
        session.push_audio_chunk(vec![2, 3]);

        let drained = session.drain_audio();
        assert_eq!(drained.len(), 2);
        assert_eq!(session.buffered_audio_chunks(), 0);
    }
}
