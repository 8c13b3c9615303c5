//! Application layer for chat-duck
//!
//! This crate contains the request lifecycle controller, its port
//! definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ChatConfig, ResponsePolicy};
pub use ports::{
    chat_completion::{ChatCompletionService, ServiceUnavailable, UnavailableCause},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    lifecycle::{LifecycleObserver, NoLifecycleObserver},
};
pub use use_cases::chat_controller::{ChatController, Lifecycle, Rejection, SubmitOutcome};
