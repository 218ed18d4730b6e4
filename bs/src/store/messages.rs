//! Idea store messages
//!
//! Commands and responses for the actor pattern.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::combine::SelectionChange;
use crate::domain::{Idea, IdeaDraft, IdeaId, IdeaPatch};

/// Errors from store operations
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Channel error")]
    ChannelError,
}

/// Response from store operations
pub type StoreResponse<T> = Result<T, StoreError>;

/// Commands sent to the IdeaStore actor
#[derive(Debug)]
pub enum StoreCommand {
    // Collection operations
    ReplaceAll {
        drafts: Vec<IdeaDraft>,
        reply: oneshot::Sender<Vec<Idea>>,
    },
    InsertCombined {
        draft: IdeaDraft,
        parents: (IdeaId, IdeaId),
        reply: oneshot::Sender<Option<Idea>>,
    },
    Reset {
        reply: oneshot::Sender<usize>,
    },

    // Per-idea operations
    Get {
        id: IdeaId,
        reply: oneshot::Sender<Option<Idea>>,
    },
    List {
        reply: oneshot::Sender<Vec<Idea>>,
    },
    Update {
        id: IdeaId,
        patch: IdeaPatch,
        reply: oneshot::Sender<Option<Idea>>,
    },
    Like {
        id: IdeaId,
        reply: oneshot::Sender<Option<u64>>,
    },
    ToggleFavorite {
        id: IdeaId,
        reply: oneshot::Sender<Option<bool>>,
    },

    // Combine selection
    ToggleSelection {
        id: IdeaId,
        reply: oneshot::Sender<SelectionChange>,
    },
    ClearSelection {
        reply: oneshot::Sender<()>,
    },
    GetSelection {
        reply: oneshot::Sender<Vec<IdeaId>>,
    },
    SelectedPair {
        reply: oneshot::Sender<Option<(Idea, Idea)>>,
    },

    // Shutdown
    Shutdown,
}
