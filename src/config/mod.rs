//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Engine settings are read with the
//! `OPENAI_` prefix.
//!
//! # Example
//!
//! ```no_run
//! use rep_coach::config::EngineConfig;
//!
//! let config = EngineConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod engine;
mod error;

pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
