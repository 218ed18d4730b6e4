//! EnrichmentService trait definition

use async_trait::async_trait;

use super::{EnrichmentError, EnrichmentOutput, EnrichmentRequest};
use crate::domain::{Brief, IdeaDraft};

/// Uniform async contract over the AI collaborators
///
/// Stateless: each call is independent and has no side effects beyond the
/// call itself. Results are validated before they are returned.
#[async_trait]
pub trait EnrichmentService: Send + Sync {
    /// Brainstorm a fresh batch of ideas from a brief
    async fn generate(&self, brief: &Brief) -> Result<Vec<IdeaDraft>, EnrichmentError>;

    /// Run one enrichment operation
    async fn invoke(&self, request: EnrichmentRequest) -> Result<EnrichmentOutput, EnrichmentError>;
}
