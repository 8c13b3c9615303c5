//! Fixed user-facing strings.

/// Assistant turn every new conversation starts with
pub const GREETING: &str = "Bonjour ! Comment puis-je vous aider aujourd'hui ?";

/// Assistant turn appended when the chat service cannot be reached
pub const FALLBACK_MESSAGE: &str = "Désolé, une erreur est survenue.";

/// Shown while a request is outstanding
pub const TYPING_INDICATOR: &str = "Le canard réfléchit...";

/// Hint shown at the input prompt
pub const INPUT_PLACEHOLDER: &str = "Posez votre question…";
