//! Completion engine adapters.

mod mock_engine;
mod openai_engine;

pub use mock_engine::{MockEngine, MockReply};
pub use openai_engine::OpenAiEngine;
