//! Error types shared across the system

use thiserror::Error;

/// Result type for domain operations
pub type Result<T> = std::result::Result<T, DomainError>;

/// Base error type for the orchestrator
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("unknown pipeline step: {0}")]
    UnknownStep(String),
}

impl DomainError {
    pub fn invalid_state_transition(from: &str, to: &str) -> Self {
        Self::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
