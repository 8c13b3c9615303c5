//! Chat completion service port
//!
//! Defines the interface for the remote assistant service. The service
//! receives the full ordered transcript and answers with the new
//! authoritative transcript.

use async_trait::async_trait;
use duck_domain::Turn;
use thiserror::Error;

/// What went wrong while talking to the chat service.
///
/// Only used for diagnostics: every cause is handled the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableCause {
    /// The request never completed (connection refused, reset, DNS, ...)
    Transport,
    /// The service answered with a non-success HTTP status
    Status(u16),
    /// The response body could not be read as a transcript
    MalformedResponse,
    /// The transcript was well-formed but refused by the response policy
    RejectedTranscript,
}

impl std::fmt::Display for UnavailableCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableCause::Transport => write!(f, "transport"),
            UnavailableCause::Status(code) => write!(f, "status {}", code),
            UnavailableCause::MalformedResponse => write!(f, "malformed response"),
            UnavailableCause::RejectedTranscript => write!(f, "rejected transcript"),
        }
    }
}

/// Failure to obtain a usable transcript from the chat service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Chat service unavailable ({cause}): {message}")]
pub struct ServiceUnavailable {
    pub cause: UnavailableCause,
    pub message: String,
}

impl ServiceUnavailable {
    pub fn new(cause: UnavailableCause, message: impl Into<String>) -> Self {
        Self {
            cause,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(UnavailableCause::Transport, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(UnavailableCause::Status(code), message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(UnavailableCause::MalformedResponse, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(UnavailableCause::RejectedTranscript, message)
    }
}

/// Gateway to the remote assistant
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    /// Send the full transcript and receive the new one
    async fn complete(&self, transcript: &[Turn]) -> Result<Vec<Turn>, ServiceUnavailable>;
}
