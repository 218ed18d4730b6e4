//! Interactive REPL for brainstorming
//!
//! Each command maps onto one session action; background enrichment notices
//! are printed before every prompt.

mod render;
mod session;

pub use session::{ReplCommand, ReplSession, parse_command};

use std::sync::Arc;

use eyre::{Context, Result};

use crate::config::Config;
use crate::enrich::LlmEnrichmentService;
use crate::llm::create_client;
use crate::session::Session;

/// Run the interactive REPL
///
/// This is the main entry point for `bs` with no subcommand.
pub async fn run_interactive(config: &Config) -> Result<()> {
    // Validate API key early
    config.llm.get_api_key()?;

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let service = Arc::new(LlmEnrichmentService::new(llm, &config.llm, &config.session));

    let mut repl = ReplSession::new(Session::new(service));
    repl.run().await
}
