//! IdeaCollection - the in-memory state owned by the store actor
//!
//! Every method here runs to completion inside one actor step, so no other
//! command can observe a half-applied mutation.

use tracing::debug;

use crate::combine::{CombineSelection, SelectionChange};
use crate::domain::{Idea, IdeaDraft, IdeaId, IdeaPatch};

/// Ideas of the current session plus the combine selection
#[derive(Debug, Default)]
pub struct IdeaCollection {
    ideas: Vec<Idea>,
    selection: CombineSelection,
    next_id: u64,
}

impl IdeaCollection {
    pub fn new() -> Self {
        Self {
            ideas: Vec::new(),
            selection: CombineSelection::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> IdeaId {
        let id = IdeaId(self.next_id);
        self.next_id += 1;
        id
    }

    fn find_mut(&mut self, id: IdeaId) -> Option<&mut Idea> {
        self.ideas.iter_mut().find(|idea| idea.id == id)
    }

    pub fn contains(&self, id: IdeaId) -> bool {
        self.ideas.iter().any(|idea| idea.id == id)
    }

    pub fn get(&self, id: IdeaId) -> Option<&Idea> {
        self.ideas.iter().find(|idea| idea.id == id)
    }

    pub fn list(&self) -> &[Idea] {
        &self.ideas
    }

    pub fn len(&self) -> usize {
        self.ideas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ideas.is_empty()
    }

    /// Replace the whole collection with a freshly generated batch
    ///
    /// Clears the combine selection. Ids keep counting up from where the
    /// previous batch stopped.
    pub fn replace_all(&mut self, drafts: Vec<IdeaDraft>) -> Vec<Idea> {
        debug!(count = drafts.len(), "IdeaCollection::replace_all: called");
        self.selection.clear();
        let ideas: Vec<Idea> = drafts
            .into_iter()
            .map(|draft| {
                let id = self.allocate_id();
                Idea::from_draft(id, draft)
            })
            .collect();
        self.ideas = ideas.clone();
        ideas
    }

    /// Append one new idea under a fresh id
    fn insert(&mut self, draft: IdeaDraft) -> Idea {
        let id = self.allocate_id();
        debug!(%id, "IdeaCollection::insert: called");
        let idea = Idea::from_draft(id, draft);
        self.ideas.push(idea.clone());
        idea
    }

    /// Append the result of combining `parents`, clearing their selection
    ///
    /// Returns None without touching anything when either parent is gone.
    pub fn insert_combined(&mut self, draft: IdeaDraft, parents: (IdeaId, IdeaId)) -> Option<Idea> {
        let (first, second) = parents;
        debug!(%first, %second, "IdeaCollection::insert_combined: called");
        if !self.contains(first) || !self.contains(second) {
            debug!("IdeaCollection::insert_combined: parent missing, discarding");
            return None;
        }
        let idea = self.insert(draft);
        if self.selection.matches(first, second) {
            self.selection.clear();
        }
        Some(idea)
    }

    /// Merge `patch` into the idea with `id`; None if the id is unknown
    pub fn update(&mut self, id: IdeaId, patch: IdeaPatch) -> Option<Idea> {
        debug!(%id, "IdeaCollection::update: called");
        let idea = self.find_mut(id)?;
        patch.apply(idea);
        Some(idea.clone())
    }

    /// Add one like; returns the new count
    pub fn like(&mut self, id: IdeaId) -> Option<u64> {
        let idea = self.find_mut(id)?;
        idea.likes = idea.likes.saturating_add(1);
        Some(idea.likes)
    }

    /// Flip the favorite flag; returns the new value
    pub fn toggle_favorite(&mut self, id: IdeaId) -> Option<bool> {
        let idea = self.find_mut(id)?;
        idea.is_favorited = !idea.is_favorited;
        Some(idea.is_favorited)
    }

    /// Drop every idea and the selection; ids are not reused afterwards
    pub fn reset(&mut self) -> usize {
        let removed = self.ideas.len();
        debug!(removed, "IdeaCollection::reset: called");
        self.ideas.clear();
        self.selection.clear();
        removed
    }

    pub fn toggle_selection(&mut self, id: IdeaId) -> SelectionChange {
        self.prune_selection();
        if !self.contains(id) {
            debug!(%id, "IdeaCollection::toggle_selection: unknown id");
            return SelectionChange::Unknown;
        }
        self.selection.toggle(id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Current selection, validated against the collection first
    pub fn selection(&mut self) -> Vec<IdeaId> {
        self.prune_selection();
        self.selection.ids().to_vec()
    }

    /// Both selected ideas by value, once exactly two valid ones are held
    pub fn selected_pair(&mut self) -> Option<(Idea, Idea)> {
        self.prune_selection();
        let (first, second) = self.selection.pair()?;
        Some((self.get(first)?.clone(), self.get(second)?.clone()))
    }

    fn prune_selection(&mut self) {
        let ideas = &self.ideas;
        self.selection
            .invalidate_missing(|id| ideas.iter().any(|idea| idea.id == id));
    }
}
