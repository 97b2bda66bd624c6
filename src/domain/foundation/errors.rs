//! Error types for the domain layer.

use thiserror::Error;

/// Errors raised by domain entities and value objects.
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Invalid phase transition from '{from}' to '{to}'")]
    InvalidPhaseTransition { from: String, to: String },
}

impl DomainError {
    /// Creates a validation error for a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid phase transition error.
    pub fn invalid_transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        DomainError::InvalidPhaseTransition {
            from: from.into(),
            to: to.into(),
        }
    }
}
