//! Controller error types

use thiserror::Error;

use crate::domain::IdeaId;
use crate::enrich::EnrichmentKind;
use crate::store::StoreError;

/// Why an enrichment request was not started
///
/// Failures of the enrichment call itself are not errors here; they come
/// back as `EnrichmentOutcome::Failed` and a `ControllerEvent::Failed`.
#[derive(Debug, Clone, Error)]
pub enum ControllerError {
    #[error("Idea {idea_id} is busy with {kind}")]
    Busy { idea_id: IdeaId, kind: EnrichmentKind },

    #[error("Idea {0} not found")]
    NotFound(IdeaId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ControllerError {
    pub fn is_busy(&self) -> bool {
        matches!(self, ControllerError::Busy { .. })
    }
}
