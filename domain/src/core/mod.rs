//! Core domain concepts shared across the crate.
//!
//! - [`user_input::UserInput`] — validated text typed by the user
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod user_input;
