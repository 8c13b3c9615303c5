//! CLI entrypoint for Chat-Duck
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use duck_application::{ChatController, ResponsePolicy, SubmitOutcome};
use duck_infrastructure::{ConfigLoader, FileConfig, HttpChatService, JsonlConversationLogger};
use duck_presentation::{ChatRepl, Cli, TypingIndicator};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered diagnostics reach the trace file
    let _trace_guard = init_tracing(&cli)?;

    let config = load_config(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources();
        println!();
        println!("Effective configuration:");
        println!("{}", config.to_toml()?);
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting Chat-Duck against {}", config.service.base_url);

    // === Dependency Injection ===
    let service = Arc::new(HttpChatService::new(&config.service.base_url));
    let mut controller = ChatController::new(service, config.chat_config());

    if !cli.quiet {
        controller = controller.with_observer(Arc::new(TypingIndicator::new()));
    }

    if let Some(path) = &config.log.conversation_log {
        match JsonlConversationLogger::open(path) {
            Some(logger) => {
                info!("Conversation log: {}", logger.path().display());
                controller = controller.with_logger(Arc::new(logger));
            }
            None => warn!("Conversation log disabled"),
        }
    }

    let repl = ChatRepl::new(controller, config.service.base_url.clone());

    // Single message mode
    if let Some(message) = cli.message {
        let (outcome, rendered) = repl.ask(&message).await;
        let code = match outcome {
            SubmitOutcome::Rejected(reason) => {
                eprintln!("Nothing to send: {}", reason);
                ExitCode::from(2)
            }
            SubmitOutcome::Replied => {
                println!("{}", rendered);
                ExitCode::SUCCESS
            }
            SubmitOutcome::FellBack => {
                println!("{}", rendered);
                ExitCode::FAILURE
            }
        };
        return Ok(code);
    }

    repl.run().await?;
    Ok(ExitCode::SUCCESS)
}

/// Merge config sources, then apply command-line overrides
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let loaded = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        if let Some(path) = &cli.config
            && !path.exists()
        {
            bail!("Config file not found: {}", path.display());
        }
        ConfigLoader::load(cli.config.as_deref())
    };
    let mut config = loaded.map_err(|e| anyhow!("Failed to load configuration: {}", e))?;

    if let Some(url) = &cli.api_url {
        config.service.base_url = url.clone();
    }
    if cli.strict {
        config.conversation.response_policy = ResponsePolicy::RequireExtension;
    }
    if let Some(path) = &cli.log_file {
        config.log.conversation_log = Some(path.clone());
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Initialize logging based on verbosity level; `RUST_LOG` wins when set
fn init_tracing(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    let Some(path) = &cli.trace_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .context("--trace-file must name a file")?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}
