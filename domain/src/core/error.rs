//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Transcript cannot be empty")]
    EmptyTranscript,
}
