//! Conversation domain.
//!
//! - [`entities::Turn`] — one message, tagged with its [`entities::Role`]
//! - [`transcript::Conversation`] — the ordered, never-empty transcript
//! - [`messages`] — fixed user-facing strings (greeting, fallback)

pub mod entities;
pub mod messages;
pub mod transcript;
