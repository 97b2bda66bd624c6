//! Coaching bounded context - the conversation state machine and
//! turn-orchestration engine for the role-play training flow.

mod audio;
mod coordinator;
mod intent;
mod objection;
mod persona;
mod phase;
mod session;
mod speaker;
mod transcript;

pub use audio::{AudioBuffer, VoiceTurnContext};
pub use coordinator::ConversationCoordinator;
pub use intent::{is_end_training, KeywordStartClassifier, StartClassifier, StartIntent};
pub use objection::{detect_objection_topic, OBJECTION_CUE_MARKER};
pub use persona::DoctorPersona;
pub use phase::TrainingPhase;
pub use session::Session;
pub use speaker::{OutboundMessage, Speaker};
pub use transcript::{Transcript, TranscriptEntry};
