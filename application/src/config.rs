//! Application-level configuration.
//!
//! Controls how the chat controller behaves: which greeting a new
//! conversation opens with, which fallback turn is appended on failure,
//! and how much the service's transcript is trusted.

use duck_domain::{FALLBACK_MESSAGE, GREETING};
use serde::{Deserialize, Serialize};

/// How a transcript returned by the chat service is checked before
/// it replaces the local one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponsePolicy {
    /// Adopt the returned transcript as-is (only an empty one is refused)
    #[default]
    Trust,
    /// The returned transcript must start with exactly what was sent
    /// and add at least one turn
    RequireExtension,
}

impl std::fmt::Display for ResponsePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponsePolicy::Trust => write!(f, "trust"),
            ResponsePolicy::RequireExtension => write!(f, "require_extension"),
        }
    }
}

/// Chat controller configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// First assistant turn of every conversation
    pub greeting: String,
    /// Assistant turn appended when the service is unavailable
    pub fallback_message: String,
    pub response_policy: ResponsePolicy,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: GREETING.to_string(),
            fallback_message: FALLBACK_MESSAGE.to_string(),
            response_policy: ResponsePolicy::Trust,
        }
    }
}

impl ChatConfig {
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    pub fn with_response_policy(mut self, policy: ResponsePolicy) -> Self {
        self.response_policy = policy;
        self
    }
}
