//! Combine selector
//!
//! Gates pairwise combination. The selection itself lives in the idea store
//! so that clearing it is atomic with inserting the combined idea and with
//! a full reset.

mod selection;

pub use selection::{CombineSelection, PAIR_SIZE, SelectionChange};

use tokio::task::JoinHandle;
use tracing::debug;

use crate::controller::{ControllerError, EnrichmentController, EnrichmentOutcome};
use crate::domain::{Idea, IdeaId};
use crate::store::StoreError;

/// Selection and confirmation of a combine pair
#[derive(Clone)]
pub struct CombineSelector {
    controller: EnrichmentController,
}

impl CombineSelector {
    pub fn new(controller: EnrichmentController) -> Self {
        Self { controller }
    }

    /// Select or deselect an idea; a third selection is refused
    pub async fn toggle(&self, id: IdeaId) -> Result<SelectionChange, StoreError> {
        debug!(%id, "CombineSelector::toggle: called");
        self.controller.store().toggle_selection(id).await
    }

    /// Currently selected ids, after dropping any that no longer exist
    pub async fn selection(&self) -> Result<Vec<IdeaId>, StoreError> {
        self.controller.store().selection().await
    }

    /// The pair awaiting confirmation, once exactly two ideas are selected
    pub async fn pending_pair(&self) -> Result<Option<(Idea, Idea)>, StoreError> {
        self.controller.store().selected_pair().await
    }

    /// Combine the selected pair in the background
    ///
    /// A no-op returning `Ok(None)` unless exactly two ideas are selected.
    /// The selection is cleared when the combined idea lands.
    pub async fn confirm(&self) -> Result<Option<JoinHandle<EnrichmentOutcome>>, ControllerError> {
        debug!("CombineSelector::confirm: called");
        self.controller.request_combine().await
    }

    /// Drop the selection without side effects
    pub async fn cancel(&self) -> Result<(), StoreError> {
        debug!("CombineSelector::cancel: called");
        self.controller.store().clear_selection().await
    }
}
