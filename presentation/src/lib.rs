//! Presentation layer for chat-duck
//!
//! This crate contains the CLI definition, transcript rendering,
//! the typing indicator, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::Cli;
pub use output::console::TranscriptFormatter;
pub use progress::typing::TypingIndicator;
