//! Configuration file loading for chat-duck
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CHAT_DUCK_API_URL` environment variable (service base address only)
//! 2. `--config <path>` specified file
//! 3. Project root: `./chat-duck.toml` or `./.chat-duck.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/chat-duck/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileConversationConfig, FileLogConfig, FileServiceConfig,
};
pub use loader::{API_URL_ENV, ConfigLoader};
