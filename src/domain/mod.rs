//! Domain layer - business logic with no infrastructure dependencies.

pub mod coaching;
pub mod foundation;
pub mod tools;
