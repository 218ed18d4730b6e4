//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{Brief, DEFAULT_LENS};

/// Brainstorm - idea generation with per-idea AI enrichment
#[derive(Parser)]
#[command(
    name = "bs",
    about = "Brainstorm ideas, then expand, refine, combine and finalize them with AI",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute; the interactive session when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the resolved configuration as YAML
    Config,

    /// Generate one batch of ideas and print it as JSON (batch mode)
    Generate(BriefArgs),
}

/// Brief fields given on the command line
#[derive(Debug, Clone, clap::Args)]
pub struct BriefArgs {
    /// What to brainstorm about
    #[arg(short, long)]
    pub subject: String,

    /// Who the ideas are for
    #[arg(short, long)]
    pub audience: String,

    /// Creative lens applied to every idea
    #[arg(long, default_value = DEFAULT_LENS)]
    pub lens: String,

    /// Constraints the ideas must respect
    #[arg(long)]
    pub constraints: Option<String>,

    /// Anything else worth knowing
    #[arg(long)]
    pub other: Option<String>,

    /// Longer description of the goal
    #[arg(short, long)]
    pub description: Option<String>,
}

impl From<BriefArgs> for Brief {
    fn from(args: BriefArgs) -> Self {
        debug!(subject = %args.subject, "Brief::from(BriefArgs): called");
        Brief {
            subject: args.subject,
            audience: args.audience,
            constraints: args.constraints,
            other: args.other,
            lens: args.lens,
            detailed_description: args.description,
        }
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("brainstorm")
        .join("logs")
        .join("brainstorm.log");
    debug!(?path, "get_log_path: returning path");
    path
}
