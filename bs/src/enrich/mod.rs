//! Enrichment service facade
//!
//! A uniform, stateless async contract over the AI-backed operations
//! (generate, expand, chat, combine, refine-from-chat), with every result
//! validated against its expected shape before it is trusted.

mod error;
mod llm_service;
#[cfg(test)]
pub mod mock;
mod prompts;
mod request;
mod service;
pub mod validate;

pub use error::EnrichmentError;
pub use llm_service::LlmEnrichmentService;
pub use prompts::PromptLoader;
pub use request::{EnrichmentKind, EnrichmentOutput, EnrichmentRequest};
pub use service::EnrichmentService;
