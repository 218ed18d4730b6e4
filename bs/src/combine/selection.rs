//! The 0-2 element set of ideas picked for combination

use serde::Serialize;
use tracing::debug;

use crate::domain::IdeaId;

/// Maximum number of ideas that can be combined at once
pub const PAIR_SIZE: usize = 2;

/// What a toggle did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionChange {
    Selected,
    Deselected,
    /// Two ideas were already selected, nothing changed
    Full,
    /// The id is not in the collection, nothing changed
    Unknown,
}

/// Ordered selection of at most two idea ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombineSelection {
    ids: Vec<IdeaId>,
}

impl CombineSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id`, or deselect it when already selected
    pub fn toggle(&mut self, id: IdeaId) -> SelectionChange {
        debug!(%id, selected = self.ids.len(), "CombineSelection::toggle: called");
        if let Some(pos) = self.ids.iter().position(|&s| s == id) {
            self.ids.remove(pos);
            return SelectionChange::Deselected;
        }
        if self.ids.len() >= PAIR_SIZE {
            debug!(%id, "CombineSelection::toggle: selection full, rejecting");
            return SelectionChange::Full;
        }
        self.ids.push(id);
        SelectionChange::Selected
    }

    pub fn ids(&self) -> &[IdeaId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: IdeaId) -> bool {
        self.ids.contains(&id)
    }

    /// The selected pair, in selection order, once exactly two are held
    pub fn pair(&self) -> Option<(IdeaId, IdeaId)> {
        match self.ids.as_slice() {
            [first, second] => Some((*first, *second)),
            _ => None,
        }
    }

    /// True when this selection holds exactly `first` and `second`, in any order
    pub fn matches(&self, first: IdeaId, second: IdeaId) -> bool {
        self.pair()
            .is_some_and(|(a, b)| (a == first && b == second) || (a == second && b == first))
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop the whole selection if any member fails `exists`
    ///
    /// A half-valid pair is never kept around: the user has to pick again.
    pub fn invalidate_missing(&mut self, exists: impl Fn(IdeaId) -> bool) -> bool {
        if self.ids.iter().all(|&id| exists(id)) {
            return false;
        }
        debug!(ids = ?self.ids, "CombineSelection::invalidate_missing: stale member, clearing");
        self.ids.clear();
        true
    }
}
