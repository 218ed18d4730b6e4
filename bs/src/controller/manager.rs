//! EnrichmentController - at most one enrichment in flight per idea
//!
//! Requests acquire the pending gate synchronously, before the service is
//! called, so a second request for a busy idea is always rejected rather than
//! queued.
//! The call itself runs in a spawned task that keeps going when the caller
//! loses interest; its result is merged into the store by id, or discarded
//! if the idea is gone by then.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{Brief, Idea, IdeaId, IdeaPatch};
use crate::enrich::{EnrichmentKind, EnrichmentOutput, EnrichmentRequest, EnrichmentService};
use crate::store::IdeaStore;

use super::error::ControllerError;
use super::gate::{PendingGate, PendingGuard};

/// Single-idea enrichment operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdeaAction {
    /// Produce `ExpandedData` for the idea
    Expand { brief: Brief },
    /// One chat turn; the exchange is appended to the idea's history
    Chat { message: String },
    /// Rewrite the idea's top-level fields from its chat history
    Refine,
}

impl IdeaAction {
    pub fn kind(&self) -> EnrichmentKind {
        match self {
            IdeaAction::Expand { .. } => EnrichmentKind::Expand,
            IdeaAction::Chat { .. } => EnrichmentKind::Chat,
            IdeaAction::Refine => EnrichmentKind::Refine,
        }
    }
}

/// How a finished enrichment landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// The idea was patched in place
    Applied(Idea),
    /// A combination produced a new idea
    Created(Idea),
    /// The target idea was removed while the call was in flight
    Discarded,
    /// The call or its validation failed; the idea is unchanged
    Failed(String),
}

/// Notice broadcast for the boundary layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    Started {
        ids: Vec<IdeaId>,
        kind: EnrichmentKind,
    },
    Completed {
        ids: Vec<IdeaId>,
        kind: EnrichmentKind,
        /// The patched idea, or the new one for a combination
        idea_id: IdeaId,
    },
    Failed {
        ids: Vec<IdeaId>,
        kind: EnrichmentKind,
        message: String,
        /// Re-triggering the same operation may succeed
        retryable: bool,
    },
    Discarded {
        ids: Vec<IdeaId>,
        kind: EnrichmentKind,
    },
}

/// Where a result is merged
#[derive(Debug)]
enum MergeTarget {
    Idea { id: IdeaId, message: Option<String> },
    Pair(IdeaId, IdeaId),
}

/// Handle to the enrichment controller
#[derive(Clone)]
pub struct EnrichmentController {
    service: Arc<dyn EnrichmentService>,
    store: IdeaStore,
    gate: PendingGate,
    event_tx: broadcast::Sender<ControllerEvent>,
}

impl EnrichmentController {
    pub fn new(service: Arc<dyn EnrichmentService>, store: IdeaStore) -> Self {
        debug!("EnrichmentController::new: called");
        let (event_tx, _) = broadcast::channel(256);
        Self {
            service,
            store,
            gate: PendingGate::new(),
            event_tx,
        }
    }

    pub fn store(&self) -> &IdeaStore {
        &self.store
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.event_tx.subscribe()
    }

    pub fn is_pending(&self, id: IdeaId) -> bool {
        self.gate.is_pending(id)
    }

    pub fn pending_kind(&self, id: IdeaId) -> Option<EnrichmentKind> {
        self.gate.pending_kind(id)
    }

    /// Every idea currently `Pending`, with the operation it waits on
    pub fn pending(&self) -> Vec<(IdeaId, EnrichmentKind)> {
        self.gate.pending()
    }

    fn emit(&self, event: ControllerEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    fn acquire(&self, ids: &[IdeaId], kind: EnrichmentKind) -> Result<PendingGuard, ControllerError> {
        self.gate
            .try_acquire(ids, kind)
            .map_err(|(idea_id, kind)| ControllerError::Busy { idea_id, kind })
    }

    /// Gate the idea and build its request from the latest stored record
    async fn prepare(&self, id: IdeaId, action: IdeaAction) -> Result<(PendingGuard, EnrichmentRequest, MergeTarget), ControllerError> {
        let guard = self.acquire(&[id], action.kind())?;
        // Dropping the guard on any error below returns the idea to Idle
        let idea = self.store.get(id).await?.ok_or(ControllerError::NotFound(id))?;

        let (request, message) = match action {
            IdeaAction::Expand { brief } => (EnrichmentRequest::Expand { idea, brief }, None),
            IdeaAction::Chat { message } => (
                EnrichmentRequest::Chat {
                    idea,
                    message: message.clone(),
                },
                Some(message),
            ),
            IdeaAction::Refine => (EnrichmentRequest::Refine { idea }, None),
        };
        Ok((guard, request, MergeTarget::Idea { id, message }))
    }

    /// Start an enrichment for one idea in the background
    ///
    /// Returns once the idea is `Pending`. The returned handle may be dropped;
    /// the task still completes and writes through to the store.
    pub async fn request(&self, id: IdeaId, action: IdeaAction) -> Result<JoinHandle<EnrichmentOutcome>, ControllerError> {
        debug!(idea_id = %id, kind = %action.kind(), "request: called");
        let (guard, request, target) = self.prepare(id, action).await?;
        Ok(self.spawn(guard, request, target))
    }

    /// Run an enrichment for one idea and wait for it to land
    pub async fn execute(&self, id: IdeaId, action: IdeaAction) -> Result<EnrichmentOutcome, ControllerError> {
        debug!(idea_id = %id, kind = %action.kind(), "execute: called");
        let (guard, request, target) = self.prepare(id, action).await?;
        self.emit_started(&guard);
        Ok(self.complete(guard, request, target).await)
    }

    /// Gate both parents of the current combine selection
    ///
    /// Returns `Ok(None)` without side effects when the selection is not a
    /// full pair.
    async fn prepare_combine(&self) -> Result<Option<(PendingGuard, EnrichmentRequest, MergeTarget)>, ControllerError> {
        let Some((first, second)) = self.store.selected_pair().await? else {
            debug!("prepare_combine: selection is not a pair, ignoring");
            return Ok(None);
        };
        let guard = self.acquire(&[first.id, second.id], EnrichmentKind::Combine)?;
        let target = MergeTarget::Pair(first.id, second.id);
        Ok(Some((guard, EnrichmentRequest::Combine { first, second }, target)))
    }

    /// Start combining the selected pair in the background
    pub async fn request_combine(&self) -> Result<Option<JoinHandle<EnrichmentOutcome>>, ControllerError> {
        debug!("request_combine: called");
        Ok(self
            .prepare_combine()
            .await?
            .map(|(guard, request, target)| self.spawn(guard, request, target)))
    }

    fn emit_started(&self, guard: &PendingGuard) {
        info!(ids = ?guard.ids(), kind = %guard.kind(), "Enrichment started");
        self.emit(ControllerEvent::Started {
            ids: guard.ids().to_vec(),
            kind: guard.kind(),
        });
    }

    fn spawn(&self, guard: PendingGuard, request: EnrichmentRequest, target: MergeTarget) -> JoinHandle<EnrichmentOutcome> {
        self.emit_started(&guard);
        let controller = self.clone();
        tokio::spawn(async move { controller.complete(guard, request, target).await })
    }

    /// Await the service, merge the result, then return the ideas to Idle
    async fn complete(&self, guard: PendingGuard, request: EnrichmentRequest, target: MergeTarget) -> EnrichmentOutcome {
        let kind = guard.kind();
        let ids = guard.ids().to_vec();
        debug!(?ids, %kind, "complete: awaiting service");

        let mut retryable = false;
        let outcome = match self.service.invoke(request).await {
            Ok(output) => self.merge(target, output).await,
            Err(e) => {
                retryable = e.is_retryable();
                warn!(?ids, %kind, error = %e, retryable, "Enrichment failed");
                EnrichmentOutcome::Failed(e.to_string())
            }
        };

        // Release only after the store write so Idle is never observed before the result
        drop(guard);

        let event = match &outcome {
            EnrichmentOutcome::Applied(idea) | EnrichmentOutcome::Created(idea) => {
                info!(?ids, %kind, idea_id = %idea.id, "Enrichment completed");
                ControllerEvent::Completed {
                    ids,
                    kind,
                    idea_id: idea.id,
                }
            }
            EnrichmentOutcome::Discarded => {
                info!(?ids, %kind, "Enrichment result discarded, idea no longer exists");
                ControllerEvent::Discarded { ids, kind }
            }
            EnrichmentOutcome::Failed(message) => ControllerEvent::Failed {
                ids,
                kind,
                message: message.clone(),
                retryable,
            },
        };
        self.emit(event);
        outcome
    }

    async fn merge(&self, target: MergeTarget, output: EnrichmentOutput) -> EnrichmentOutcome {
        debug!(?target, kind = %output.kind(), "merge: called");
        let patch = match (target, output) {
            (MergeTarget::Idea { id, .. }, EnrichmentOutput::Expanded(data)) => (id, IdeaPatch::expanded(data)),
            (MergeTarget::Idea { id, message: Some(message) }, EnrichmentOutput::Reply(reply)) => {
                (id, IdeaPatch::chat_exchange(message, reply))
            }
            (MergeTarget::Idea { id, .. }, EnrichmentOutput::Refined(fields)) => (id, IdeaPatch::refined(fields)),
            (MergeTarget::Pair(first, second), EnrichmentOutput::Combined(draft)) => {
                return match self.store.insert_combined(draft, (first, second)).await {
                    Ok(Some(idea)) => EnrichmentOutcome::Created(idea),
                    Ok(None) => EnrichmentOutcome::Discarded,
                    Err(e) => EnrichmentOutcome::Failed(e.to_string()),
                };
            }
            (target, output) => {
                warn!(?target, kind = %output.kind(), "merge: result does not match request");
                return EnrichmentOutcome::Failed(format!("unexpected {} result", output.kind()));
            }
        };

        let (id, patch) = patch;
        match self.store.update(id, patch).await {
            Ok(Some(idea)) => EnrichmentOutcome::Applied(idea),
            Ok(None) => EnrichmentOutcome::Discarded,
            Err(e) => EnrichmentOutcome::Failed(e.to_string()),
        }
    }
}
