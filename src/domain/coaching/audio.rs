//! Session-scoped audio buffering and voice-turn bookkeeping.
//!
//! Raw audio chunks accumulate between a start and end-of-input signal, then
//! the whole buffer is handed off to the speech collaborator in one atomic
//! drain. The core never inspects the bytes.

/// Append-then-drain buffer of raw audio chunks.
#[derive(Debug, Clone, Default)]
pub struct AudioBuffer {
    chunks: Vec<Vec<u8>>,
}

impl AudioBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk of raw audio bytes.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        self.chunks.push(chunk);
    }

    /// Swaps in an empty buffer and returns the accumulated chunks.
    ///
    /// No partial drains: the caller receives everything buffered so far and
    /// the buffer is empty afterwards.
    pub fn drain(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.chunks)
    }

    /// Returns the number of buffered chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Returns the total buffered byte count.
    pub fn total_bytes(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }
}

/// Bookkeeping for a voice gateway relaying one session.
///
/// Mirrors the active persona name and whether spoken replies are expected,
/// so the gateway can route synthesized doctor lines without reaching into
/// the session. Cleared when training completes.
#[derive(Debug, Clone, Default)]
pub struct VoiceTurnContext {
    doctor_name: Option<String>,
    voice_replies: bool,
}

impl VoiceTurnContext {
    /// Creates an empty context with voice replies disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the persona the gateway is voicing.
    pub fn set_doctor(&mut self, name: impl Into<String>) {
        self.doctor_name = Some(name.into());
    }

    /// Returns the voiced persona name, if a training run is active.
    pub fn doctor_name(&self) -> Option<&str> {
        self.doctor_name.as_deref()
    }

    /// Enables or disables spoken replies for this session.
    pub fn set_voice_replies(&mut self, enabled: bool) {
        self.voice_replies = enabled;
    }

    /// Returns true if doctor lines should be synthesized to speech.
    pub fn voice_replies(&self) -> bool {
        self.voice_replies
    }

    /// Clears persona and reply mode at end of training.
    pub fn clear(&mut self) {
        self.doctor_name = None;
        self.voice_replies = false;
    }
}
