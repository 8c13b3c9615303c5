//! User input value object

use super::error::DomainError;

/// Text typed by the user that is allowed to become a turn (Value Object)
///
/// The content is kept exactly as typed; only the emptiness check
/// looks at the trimmed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    content: String,
}

impl UserInput {
    /// Validate raw text, rejecting anything that trims to empty
    pub fn parse(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::EmptyInput);
        }
        Ok(Self { content })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for UserInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<&str> for UserInput {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        UserInput::parse(s)
    }
}
