//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//!
//! ```toml
//! [service]
//! base_url = "http://localhost:8000"
//!
//! [conversation]
//! greeting = "Bonjour ! Comment puis-je vous aider aujourd'hui ?"
//! fallback_message = "Désolé, une erreur est survenue."
//! response_policy = "trust"   # or "require_extension"
//!
//! [log]
//! conversation_log = "~/.local/share/chat-duck/conversation.jsonl"
//! ```

use crate::http::DEFAULT_API_URL;
use duck_application::{ChatConfig, ResponsePolicy};
use duck_domain::{FALLBACK_MESSAGE, GREETING};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("service.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("service.base_url must start with http:// or https://, got {0:?}")]
    UnsupportedScheme(String),

    #[error("conversation.greeting cannot be empty")]
    EmptyGreeting,

    #[error("conversation.fallback_message cannot be empty")]
    EmptyFallbackMessage,
}

/// Raw chat service configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServiceConfig {
    /// Base address of the chat API; `/chat` is appended
    pub base_url: String,
}

impl Default for FileServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Raw conversation configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConversationConfig {
    pub greeting: String,
    pub fallback_message: String,
    pub response_policy: ResponsePolicy,
}

impl Default for FileConversationConfig {
    fn default() -> Self {
        Self {
            greeting: GREETING.to_string(),
            fallback_message: FALLBACK_MESSAGE.to_string(),
            response_policy: ResponsePolicy::default(),
        }
    }
}

/// Raw log configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// JSONL transcript log; disabled when unset
    pub conversation_log: Option<PathBuf>,
}

/// Complete configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub service: FileServiceConfig,
    pub conversation: FileConversationConfig,
    pub log: FileLogConfig,
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let base_url = self.service.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigValidationError::UnsupportedScheme(base_url.to_string()));
        }
        if self.conversation.greeting.trim().is_empty() {
            return Err(ConfigValidationError::EmptyGreeting);
        }
        if self.conversation.fallback_message.trim().is_empty() {
            return Err(ConfigValidationError::EmptyFallbackMessage);
        }
        Ok(())
    }

    /// Render the merged configuration back as TOML (for --show-config)
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Controller settings carried by this file
    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig::default()
            .with_greeting(self.conversation.greeting.clone())
            .with_fallback_message(self.conversation.fallback_message.clone())
            .with_response_policy(self.conversation.response_policy)
    }
}
