//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::output::console::TranscriptFormatter;
use colored::Colorize;
use duck_application::{ChatCompletionService, ChatController, Rejection, SubmitOutcome};
use duck_domain::{INPUT_PLACEHOLDER, Turn};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use tracing::debug;

/// What a slash command asks the loop to do
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Help,
    History,
    Unknown,
}

fn parse_command(line: &str) -> Command {
    match line.trim() {
        "/quit" | "/exit" | "/q" => Command::Quit,
        "/help" | "/h" | "/?" => Command::Help,
        "/history" => Command::History,
        _ => Command::Unknown,
    }
}

/// Interactive chat REPL over one conversation
pub struct ChatRepl<S: ChatCompletionService + 'static> {
    controller: ChatController<S>,
    service_url: String,
}

impl<S: ChatCompletionService + 'static> ChatRepl<S> {
    pub fn new(controller: ChatController<S>, service_url: impl Into<String>) -> Self {
        Self {
            controller,
            service_url: service_url.into(),
        }
    }

    pub fn controller(&self) -> &ChatController<S> {
        &self.controller
    }

    /// Submit one message and render whatever it changed.
    ///
    /// Returns the outcome and the text to print (empty when rejected).
    pub async fn ask(&self, text: &str) -> (SubmitOutcome, String) {
        let mut seen = self.controller.snapshot();
        let outcome = self.controller.submit(text).await;

        let rendered = match outcome {
            SubmitOutcome::Rejected(_) => String::new(),
            SubmitOutcome::Replied | SubmitOutcome::FellBack => {
                // the user already sees what they typed
                seen.push(Turn::user(text));
                TranscriptFormatter::format_update(&seen, &self.controller.snapshot())
            }
        };
        (outcome, rendered)
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("chat-duck").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Err(e) = rl.load_history(path) {
                debug!("No REPL history loaded from {}: {}", path.display(), e);
            }
        }

        self.print_welcome();

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    if line.trim_start().starts_with('/') {
                        if self.handle_command(&line) {
                            break;
                        }
                        continue;
                    }

                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                    }

                    let (outcome, rendered) = self.ask(&line).await;
                    match outcome {
                        SubmitOutcome::Rejected(Rejection::EmptyInput) => {}
                        SubmitOutcome::Rejected(Rejection::Busy) => {
                            println!("{}", "Une réponse est déjà en cours…".dimmed());
                        }
                        SubmitOutcome::Replied | SubmitOutcome::FellBack => {
                            println!();
                            println!("{}", rendered);
                            println!();
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Au revoir !");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│                  Chat-Duck                  │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("{} {}", "Service:".cyan().bold(), self.service_url);
        println!("{}", INPUT_PLACEHOLDER.dimmed());
        println!("{}", "/help for commands".dimmed());
        println!();
        println!(
            "{}",
            TranscriptFormatter::format_transcript(&self.controller.snapshot())
        );
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /help, /h, /?    - Show this help");
        println!("  /history         - Show the whole conversation");
        println!("  /quit, /exit, /q - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&self, line: &str) -> bool {
        match parse_command(line) {
            Command::Quit => {
                println!("Au revoir !");
                true
            }
            Command::Help => {
                Self::print_help();
                false
            }
            Command::History => {
                println!();
                println!(
                    "{}",
                    TranscriptFormatter::format_transcript(&self.controller.snapshot())
                );
                println!();
                false
            }
            Command::Unknown => {
                println!("Unknown command: {}", line.trim());
                println!("Type /help for available commands");
                false
            }
        }
    }
}
