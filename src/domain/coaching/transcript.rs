//! Append-only transcript of a training session.
//!
//! The transcript is the source for doctor context windows and the final
//! summary; entries are never mutated in place.

use serde::{Deserialize, Serialize};

use super::Speaker;

/// One (speaker, utterance) pair in a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    speaker: Speaker,
    utterance: String,
}

impl TranscriptEntry {
    /// Returns the speaker.
    pub fn speaker(&self) -> &Speaker {
        &self.speaker
    }

    /// Returns the utterance.
    pub fn utterance(&self) -> &str {
        &self.utterance
    }
}

/// Ordered, append-only sequence of session utterances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. The only mutation the transcript supports.
    pub fn append(&mut self, speaker: Speaker, utterance: impl Into<String>) {
        self.entries.push(TranscriptEntry {
            speaker,
            utterance: utterance.into(),
        });
    }

    /// Returns all entries in order.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the transcript has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the second-to-last entry, if at least two exist.
    ///
    /// During doctor interaction this is the doctor's prior line (the last
    /// entry is the trainee utterance just recorded).
    pub fn second_to_last(&self) -> Option<&TranscriptEntry> {
        self.entries.len().checked_sub(2).map(|i| &self.entries[i])
    }

    /// Builds the doctor context window: the most recent entries spoken by
    /// the doctor or the trainee, capped at `cap`, in chronological order,
    /// each formatted as "tag: utterance".
    pub fn doctor_context_window(&self, cap: usize) -> Vec<String> {
        let mut window: Vec<String> = self
            .entries
            .iter()
            .rev()
            .filter(|e| e.speaker.is_doctor() || e.speaker == Speaker::User)
            .take(cap)
            .map(|e| format!("{}: {}", e.speaker, e.utterance))
            .collect();
        window.reverse();
        window
    }

    /// Renders the full transcript as "speaker: utterance" lines, one per
    /// entry, for the final summary prompt.
    pub fn render(&self) -> String {
        let mut rendered = String::new();
        for entry in &self.entries {
            rendered.push_str(&format!("{}: {}\n", entry.speaker, entry.utterance));
        }
        rendered
    }
}
