//! IdeaStore - actor that owns the idea collection
//!
//! Processes commands one at a time via channels, so every mutation is atomic
//! with respect to interleaved enrichment tasks.

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use crate::combine::SelectionChange;
use crate::domain::{Idea, IdeaDraft, IdeaId, IdeaPatch};

use super::collection::IdeaCollection;
use super::messages::{StoreCommand, StoreError, StoreResponse};

/// Event broadcast when the collection changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The whole collection was replaced by a new batch
    Replaced { ids: Vec<IdeaId> },
    /// A single idea was appended (combination result)
    Inserted { id: IdeaId },
    /// An idea was patched in place
    Updated { id: IdeaId },
    /// Every idea was removed
    Cleared { removed: usize },
}

/// Handle to send commands to the IdeaStore actor
#[derive(Clone)]
pub struct IdeaStore {
    tx: mpsc::Sender<StoreCommand>,
    /// Broadcast sender for change notifications
    event_tx: broadcast::Sender<StoreEvent>,
}

impl IdeaStore {
    /// Spawn a new IdeaStore actor with an empty collection
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn() -> Self {
        debug!("IdeaStore::spawn: called");
        let (tx, rx) = mpsc::channel(256);
        let (event_tx, _) = broadcast::channel(64);

        tokio::spawn(actor_loop(IdeaCollection::new(), rx, event_tx.clone()));

        info!("IdeaStore spawned");
        Self { tx, event_tx }
    }

    /// Subscribe to change events
    pub fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    /// Send a command and wait for its reply
    async fn call<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> StoreCommand) -> StoreResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| StoreError::ChannelError)?;
        reply_rx.await.map_err(|_| StoreError::ChannelError)
    }

    // === Collection operations ===

    /// Replace the collection with a generated batch, clearing the combine selection
    pub async fn replace_all(&self, drafts: Vec<IdeaDraft>) -> StoreResponse<Vec<Idea>> {
        debug!(count = drafts.len(), "replace_all: called");
        self.call(|reply| StoreCommand::ReplaceAll { drafts, reply }).await
    }

    /// Append a combination result and clear the pair's selection in one step
    ///
    /// Returns None when either parent no longer exists.
    pub async fn insert_combined(&self, draft: IdeaDraft, parents: (IdeaId, IdeaId)) -> StoreResponse<Option<Idea>> {
        debug!(first = %parents.0, second = %parents.1, "insert_combined: called");
        self.call(|reply| StoreCommand::InsertCombined { draft, parents, reply })
            .await
    }

    /// Remove every idea and the selection
    pub async fn reset(&self) -> StoreResponse<usize> {
        debug!("reset: called");
        self.call(|reply| StoreCommand::Reset { reply }).await
    }

    // === Per-idea operations ===

    pub async fn get(&self, id: IdeaId) -> StoreResponse<Option<Idea>> {
        debug!(%id, "get: called");
        self.call(|reply| StoreCommand::Get { id, reply }).await
    }

    pub async fn list(&self) -> StoreResponse<Vec<Idea>> {
        debug!("list: called");
        self.call(|reply| StoreCommand::List { reply }).await
    }

    /// Merge a patch into the idea with `id`
    ///
    /// Unknown ids are a silent no-op and yield None.
    pub async fn update(&self, id: IdeaId, patch: IdeaPatch) -> StoreResponse<Option<Idea>> {
        debug!(%id, "update: called");
        self.call(|reply| StoreCommand::Update { id, patch, reply }).await
    }

    pub async fn like(&self, id: IdeaId) -> StoreResponse<Option<u64>> {
        debug!(%id, "like: called");
        self.call(|reply| StoreCommand::Like { id, reply }).await
    }

    pub async fn toggle_favorite(&self, id: IdeaId) -> StoreResponse<Option<bool>> {
        debug!(%id, "toggle_favorite: called");
        self.call(|reply| StoreCommand::ToggleFavorite { id, reply }).await
    }

    // === Combine selection ===

    pub async fn toggle_selection(&self, id: IdeaId) -> StoreResponse<SelectionChange> {
        debug!(%id, "toggle_selection: called");
        self.call(|reply| StoreCommand::ToggleSelection { id, reply }).await
    }

    pub async fn clear_selection(&self) -> StoreResponse<()> {
        debug!("clear_selection: called");
        self.call(|reply| StoreCommand::ClearSelection { reply }).await
    }

    pub async fn selection(&self) -> StoreResponse<Vec<IdeaId>> {
        self.call(|reply| StoreCommand::GetSelection { reply }).await
    }

    /// Full records of the selected pair, if exactly two valid ideas are selected
    pub async fn selected_pair(&self) -> StoreResponse<Option<(Idea, Idea)>> {
        debug!("selected_pair: called");
        self.call(|reply| StoreCommand::SelectedPair { reply }).await
    }

    /// Stop the actor
    pub async fn shutdown(&self) -> StoreResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(StoreCommand::Shutdown)
            .await
            .map_err(|_| StoreError::ChannelError)
    }
}

/// The actor loop that owns the collection and processes commands
///
/// Change events are broadcast from here, in mutation order, before the
/// caller is answered.
async fn actor_loop(
    mut ideas: IdeaCollection,
    mut rx: mpsc::Receiver<StoreCommand>,
    event_tx: broadcast::Sender<StoreEvent>,
) {
    debug!("IdeaStore actor started");
    // No subscribers is fine
    let emit = |event: StoreEvent| {
        let _ = event_tx.send(event);
    };

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StoreCommand::ReplaceAll { drafts, reply } => {
                debug!(count = drafts.len(), "actor_loop: ReplaceAll command");
                let replaced = ideas.replace_all(drafts);
                emit(StoreEvent::Replaced {
                    ids: replaced.iter().map(|i| i.id).collect(),
                });
                let _ = reply.send(replaced);
            }

            StoreCommand::InsertCombined { draft, parents, reply } => {
                debug!(?parents, "actor_loop: InsertCombined command");
                let inserted = ideas.insert_combined(draft, parents);
                if let Some(idea) = &inserted {
                    emit(StoreEvent::Inserted { id: idea.id });
                }
                let _ = reply.send(inserted);
            }

            StoreCommand::Reset { reply } => {
                debug!("actor_loop: Reset command");
                let removed = ideas.reset();
                emit(StoreEvent::Cleared { removed });
                let _ = reply.send(removed);
            }

            StoreCommand::Get { id, reply } => {
                debug!(%id, "actor_loop: Get command");
                let _ = reply.send(ideas.get(id).cloned());
            }

            StoreCommand::List { reply } => {
                debug!("actor_loop: List command");
                let _ = reply.send(ideas.list().to_vec());
            }

            StoreCommand::Update { id, patch, reply } => {
                debug!(%id, "actor_loop: Update command");
                let updated = ideas.update(id, patch);
                if updated.is_some() {
                    emit(StoreEvent::Updated { id });
                } else {
                    debug!(%id, "actor_loop: idea no longer present");
                }
                let _ = reply.send(updated);
            }

            StoreCommand::Like { id, reply } => {
                debug!(%id, "actor_loop: Like command");
                let likes = ideas.like(id);
                if likes.is_some() {
                    emit(StoreEvent::Updated { id });
                }
                let _ = reply.send(likes);
            }

            StoreCommand::ToggleFavorite { id, reply } => {
                debug!(%id, "actor_loop: ToggleFavorite command");
                let favorited = ideas.toggle_favorite(id);
                if favorited.is_some() {
                    emit(StoreEvent::Updated { id });
                }
                let _ = reply.send(favorited);
            }

            StoreCommand::ToggleSelection { id, reply } => {
                debug!(%id, "actor_loop: ToggleSelection command");
                let _ = reply.send(ideas.toggle_selection(id));
            }

            StoreCommand::ClearSelection { reply } => {
                debug!("actor_loop: ClearSelection command");
                ideas.clear_selection();
                let _ = reply.send(());
            }

            StoreCommand::GetSelection { reply } => {
                debug!("actor_loop: GetSelection command");
                let _ = reply.send(ideas.selection());
            }

            StoreCommand::SelectedPair { reply } => {
                debug!("actor_loop: SelectedPair command");
                let _ = reply.send(ideas.selected_pair());
            }

            StoreCommand::Shutdown => {
                info!("IdeaStore shutting down");
                break;
            }
        }
    }

    debug!("IdeaStore actor stopped");
}
