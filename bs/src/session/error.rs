//! Session error types

use thiserror::Error;

use crate::controller::ControllerError;
use crate::domain::{BriefError, IdeaId};
use crate::store::StoreError;

/// Why a session action was rejected
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Cannot {action} while in {phase}")]
    WrongPhase { action: &'static str, phase: &'static str },

    #[error("Idea {0} not found")]
    NotFound(IdeaId),

    #[error("No refine dialog is open")]
    NoRefineDialog,

    #[error(transparent)]
    InvalidBrief(#[from] BriefError),

    #[error(transparent)]
    Controller(#[from] ControllerError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
