//! Console rendering of the transcript

use colored::Colorize;
use duck_domain::{Role, Turn};

/// Formats turns for terminal display
pub struct TranscriptFormatter;

impl TranscriptFormatter {
    fn label(role: Role) -> String {
        match role {
            Role::User => "vous   ›".green().bold().to_string(),
            Role::Assistant => "canard ›".yellow().bold().to_string(),
            Role::System => "source ›".dimmed().to_string(),
        }
    }

    /// Format a single turn
    pub fn format_turn(turn: &Turn) -> String {
        let content = match turn.role() {
            Role::System => turn.content().dimmed().to_string(),
            _ => turn.content().to_string(),
        };
        format!("{} {}", Self::label(turn.role()), content)
    }

    /// Format the whole transcript, one turn per block
    pub fn format_transcript(turns: &[Turn]) -> String {
        turns
            .iter()
            .map(Self::format_turn)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Format what changed between the transcript the user has already
    /// seen and the current one.
    ///
    /// When `current` continues `seen`, only the new turns are shown.
    /// Otherwise the service rewrote history and everything is shown again.
    pub fn format_update(seen: &[Turn], current: &[Turn]) -> String {
        if current.starts_with(seen) {
            return Self::format_transcript(&current[seen.len()..]);
        }
        format!(
            "{}\n\n{}",
            "── transcript updated by the service ──".dimmed(),
            Self::format_transcript(current)
        )
    }
}
