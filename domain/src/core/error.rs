//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Raised synchronously by value-object constructors and parsers, so invalid
/// configuration never reaches the round loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid participant id: {0}")]
    InvalidParticipantId(String),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Unknown participant role: {0}")]
    UnknownRole(String),

    #[error("Unknown arbiter kind: {0}")]
    UnknownArbiter(String),

    #[error("Unknown debate mode: {0}")]
    UnknownMode(String),

    #[error("Participant index {index} is out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unknown prompt key: {0}")]
    UnknownPromptKey(String),
}

/// Errors raised by generation collaborators (participant composers,
/// arbiters, backends).
///
/// The coordinator never inspects or retries these; they surface unchanged
/// to the caller of a debate.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Empty response from model {0}")]
    EmptyResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

impl GenerationError {
    /// Whether a backend may reasonably try the same request again.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GenerationError::ConnectionError(_) | GenerationError::Timeout
        )
    }
}
