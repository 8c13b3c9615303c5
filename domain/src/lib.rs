//! Domain layer for chat-duck
//!
//! This crate contains the conversation entities and the transcript store.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Turn**: one message, authored by the user or the assistant
//! - **Conversation**: the ordered transcript; it starts with a greeting,
//!   only grows or is replaced wholesale, and is never empty

pub mod conversation;
pub mod core;

// Re-export commonly used types
pub use conversation::{
    entities::{Role, Turn},
    messages::{FALLBACK_MESSAGE, GREETING, INPUT_PLACEHOLDER, TYPING_INDICATOR},
    transcript::Conversation,
};
pub use crate::core::{error::DomainError, user_input::UserInput};
