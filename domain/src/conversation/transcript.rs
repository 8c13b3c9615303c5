//! The conversation store.

use super::entities::Turn;
use crate::core::error::DomainError;
use crate::core::user_input::UserInput;

/// Ordered transcript of turns (Entity)
///
/// The single source of truth for what is displayed. Turns are only ever
/// appended or wholesale replaced; the transcript is never reordered,
/// never has turns removed, and is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Start a conversation with a single assistant greeting
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::assistant(greeting)],
        }
    }

    /// Append a user turn.
    ///
    /// Fails with [`DomainError::EmptyInput`] when `text` trims to empty;
    /// the transcript is left untouched in that case.
    pub fn append_user_turn(&mut self, text: &str) -> Result<(), DomainError> {
        let input = UserInput::parse(text)?;
        self.turns.push(Turn::user(input.into_content()));
        Ok(())
    }

    /// Append an assistant turn (fallback path)
    pub fn append_assistant_turn(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::assistant(text));
    }

    /// Substitute the whole transcript with the one provided.
    ///
    /// No merge is attempted. An empty sequence is refused so the
    /// transcript never becomes empty.
    pub fn replace_all(&mut self, turns: Vec<Turn>) -> Result<(), DomainError> {
        if turns.is_empty() {
            return Err(DomainError::EmptyTranscript);
        }
        self.turns = turns;
        Ok(())
    }

    /// Owned copy of the current transcript, for rendering
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Whether `candidate` starts with this whole transcript and adds
    /// at least one turn after it.
    pub fn is_extended_by(&self, candidate: &[Turn]) -> bool {
        candidate.len() > self.turns.len() && candidate.starts_with(&self.turns)
    }
}
