//! Ports - interfaces to external collaborators.

mod completion_engine;

pub use completion_engine::{
    Completion, CompletionEngine, CompletionError, CompletionRequest, EngineInfo, EngineMessage,
    EngineRole,
};
