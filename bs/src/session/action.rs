//! Session actions and their outcomes

use serde::Serialize;

use crate::combine::SelectionChange;
use crate::domain::{Brief, Idea, IdeaId};
use crate::enrich::EnrichmentKind;

/// Which overlay is shown for the active idea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogMode {
    Expand,
    Refine,
}

/// The idea currently shown in an expand or refine overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveDialog {
    pub idea_id: IdeaId,
    pub mode: DialogMode,
}

/// What a dialog shows, rebuilt from the store on every read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub idea: Idea,
    pub mode: DialogMode,
    /// Enrichment in flight for this idea, if any
    pub pending: Option<EnrichmentKind>,
}

impl DialogView {
    /// True while an expand dialog waits for its expansion
    pub fn is_loading(&self) -> bool {
        match self.mode {
            DialogMode::Expand => !self.idea.is_expanded() && self.pending == Some(EnrichmentKind::Expand),
            DialogMode::Refine => self.pending.is_some(),
        }
    }
}

/// Every user action the session accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Brainstorm a fresh batch from a brief
    Generate(Brief),
    Like(IdeaId),
    ToggleFavorite(IdeaId),
    /// Show an idea in an overlay; an expand overlay expands the idea if needed
    OpenDialog { id: IdeaId, mode: DialogMode },
    /// Hide the overlay; an in-flight enrichment keeps running
    CloseDialog,
    /// One chat turn in the open refine dialog
    SendChat { message: String },
    /// Rewrite the refine dialog's idea from its chat history
    ApplyChat,
    ToggleCombine(IdeaId),
    ConfirmCombine,
    CancelCombine,
    Finalize(IdeaId),
    StartOver,
}

impl SessionAction {
    pub fn name(&self) -> &'static str {
        match self {
            SessionAction::Generate(_) => "generate",
            SessionAction::Like(_) => "like",
            SessionAction::ToggleFavorite(_) => "favorite",
            SessionAction::OpenDialog { .. } => "open-dialog",
            SessionAction::CloseDialog => "close-dialog",
            SessionAction::SendChat { .. } => "send-chat",
            SessionAction::ApplyChat => "apply-chat",
            SessionAction::ToggleCombine(_) => "toggle-combine",
            SessionAction::ConfirmCombine => "confirm-combine",
            SessionAction::CancelCombine => "cancel-combine",
            SessionAction::Finalize(_) => "finalize",
            SessionAction::StartOver => "start-over",
        }
    }
}

/// Result of dispatching an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Generated(Vec<Idea>),
    Liked { id: IdeaId, likes: u64 },
    Favorited { id: IdeaId, favorited: bool },
    DialogOpened(DialogView),
    DialogClosed,
    /// An enrichment is running in the background
    Started { ids: Vec<IdeaId>, kind: EnrichmentKind },
    Selection {
        change: SelectionChange,
        selected: Vec<IdeaId>,
    },
    SelectionCleared,
    Finalized(Box<Idea>),
    Reset,
    /// The action had nothing to act on; state is unchanged
    Ignored(String),
    /// An enrichment or generation call failed; state is unchanged
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures;

    fn view(mode: DialogMode, pending: Option<EnrichmentKind>) -> DialogView {
        DialogView {
            idea: Idea::from_draft(IdeaId(1), fixtures::draft("Retreat")),
            mode,
            pending,
        }
    }

    #[test]
    fn test_expand_loading_only_for_pending_expand() {
        assert!(view(DialogMode::Expand, Some(EnrichmentKind::Expand)).is_loading());
        assert!(!view(DialogMode::Expand, Some(EnrichmentKind::Chat)).is_loading());
        assert!(!view(DialogMode::Expand, None).is_loading());
        assert!(view(DialogMode::Refine, Some(EnrichmentKind::Chat)).is_loading());
    }
}
