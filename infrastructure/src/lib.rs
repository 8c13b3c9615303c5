//! Infrastructure layer for chat-duck
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use config::{
    API_URL_ENV, ConfigLoader, ConfigValidationError, FileConfig, FileConversationConfig,
    FileLogConfig, FileServiceConfig,
};
pub use http::{DEFAULT_API_URL, HttpChatService};
pub use logging::JsonlConversationLogger;
