//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for chat-duck
#[derive(Parser, Debug)]
#[command(name = "chat-duck")]
#[command(author, version, about = "Terminal client for the Chat-Duck assistant")]
#[command(long_about = r#"
Chat-Duck sends your conversation to the chat service and shows its reply.

Each message is appended to the transcript right away; the whole transcript
is then sent to the service, whose answer becomes the new transcript. If the
service cannot be reached, a short apology is added instead and you can
simply send your message again.

Configuration files are loaded from (in priority order):
1. CHAT_DUCK_API_URL   Service base address (environment)
2. --config <path>     Explicit config file
3. ./chat-duck.toml    Project-level config
4. ~/.config/chat-duck/config.toml   Global config

Example:
  chat-duck
  chat-duck "Quelles sont les nouvelles du jour ?"
  chat-duck --api-url http://duck.internal:8000
"#)]
pub struct Cli {
    /// Send a single message and print the reply (omit for interactive chat)
    pub message: Option<String>,

    /// Base address of the chat service (overrides config and environment)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Only accept replies that extend the transcript that was sent
    #[arg(long)]
    pub strict: bool,

    /// Append conversation events to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub trace_file: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Hide the typing indicator
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_one_shot_message() {
        let cli = Cli::parse_from(["chat-duck", "-vv", "--strict", "Salut"]);
        assert_eq!(cli.message.as_deref(), Some("Salut"));
        assert_eq!(cli.verbose, 2);
        assert!(cli.strict);
        assert!(cli.api_url.is_none());
    }

    #[test]
    fn test_parse_interactive_with_overrides() {
        let cli = Cli::parse_from([
            "chat-duck",
            "--api-url",
            "http://duck.internal:8000",
            "--log-file",
            "duck.jsonl",
            "-q",
        ]);
        assert!(cli.message.is_none());
        assert_eq!(cli.api_url.as_deref(), Some("http://duck.internal:8000"));
        assert_eq!(cli.log_file, Some(PathBuf::from("duck.jsonl")));
        assert!(cli.quiet);
    }
}
