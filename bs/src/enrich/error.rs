//! Enrichment error types

use thiserror::Error;

use crate::llm::LlmError;

/// Tagged failure of an enrichment call
///
/// Never propagated past the enrichment controller; it is turned into a
/// user-visible notice there.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// The AI collaborator call itself failed (network, timeout, quota)
    #[error("Service failure: {0}")]
    Service(#[from] LlmError),

    /// The collaborator answered, but not in the expected shape
    #[error("Invalid result: {0}")]
    Validation(String),

    /// A prompt template could not be rendered
    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl EnrichmentError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for failures where re-triggering the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            EnrichmentError::Service(e) => e.is_transient(),
            // Model output varies between calls
            EnrichmentError::Validation(_) => true,
            EnrichmentError::Prompt(_) => false,
        }
    }
}
