//! Brainstorm - idea generation with per-idea AI enrichment
//!
//! CLI entry point for the interactive session and batch generation.

use std::fs;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use brainstorm::cli::{Cli, Command, get_log_path};
use brainstorm::config::Config;
use brainstorm::domain::Brief;
use brainstorm::enrich::LlmEnrichmentService;
use brainstorm::llm::create_client;
use brainstorm::repl;
use brainstorm::session::{ActionOutcome, Session, SessionAction};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "Brainstorm loaded config: provider={} model={}",
        config.llm.provider, config.llm.model
    );

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Config) => {
            debug!("main: matched Config command");
            cmd_config(&config)
        }
        Some(Command::Generate(args)) => {
            debug!("main: matched Generate command");
            cmd_generate(&config, args.into()).await
        }
        None => {
            debug!("main: no command, running interactive session");
            repl::run_interactive(&config).await
        }
    }
}

/// Print the resolved configuration
fn cmd_config(config: &Config) -> Result<()> {
    debug!("cmd_config: called");
    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
    print!("{}", yaml);
    Ok(())
}

/// Generate one batch of ideas and print them as JSON
async fn cmd_generate(config: &Config, brief: Brief) -> Result<()> {
    debug!(subject = %brief.subject, "cmd_generate: called");
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let service = Arc::new(LlmEnrichmentService::new(llm, &config.llm, &config.session));
    let mut session = Session::new(service);

    let outcome = session.dispatch(SessionAction::Generate(brief)).await?;
    match outcome {
        ActionOutcome::Generated(ideas) => {
            let json = serde_json::to_string_pretty(&ideas).context("Failed to serialize ideas")?;
            println!("{}", json);
            Ok(())
        }
        ActionOutcome::Failed(message) => Err(eyre::eyre!("Generation failed: {}", message)),
        other => Err(eyre::eyre!("Unexpected outcome: {:?}", other)),
    }
}
