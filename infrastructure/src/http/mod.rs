//! HTTP adapter for the chat completion service.

mod chat_service;

pub use chat_service::{DEFAULT_API_URL, HttpChatService};
