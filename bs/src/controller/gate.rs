//! Per-idea Idle/Pending gate
//!
//! An idea is `Pending(kind)` while it has an entry in the map and `Idle`
//! otherwise. Entries are only ever removed by dropping the `PendingGuard`
//! that created them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::domain::IdeaId;
use crate::enrich::EnrichmentKind;

type PendingMap = HashMap<IdeaId, EnrichmentKind>;

/// Shared registry of ideas with an enrichment in flight
#[derive(Debug, Clone, Default)]
pub struct PendingGate {
    pending: Arc<Mutex<PendingMap>>,
}

impl PendingGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PendingMap> {
        // The map is left consistent by every critical section, so a poisoned lock is still usable
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mark every id in `ids` as pending, or none of them
    ///
    /// On conflict returns the first busy id and the kind it is busy with.
    pub fn try_acquire(&self, ids: &[IdeaId], kind: EnrichmentKind) -> Result<PendingGuard, (IdeaId, EnrichmentKind)> {
        debug!(?ids, %kind, "try_acquire: called");
        let mut pending = self.lock();
        if let Some((id, busy)) = ids.iter().find_map(|id| pending.get(id).map(|k| (*id, *k))) {
            debug!(%id, %busy, "try_acquire: busy");
            return Err((id, busy));
        }

        let mut held = Vec::with_capacity(ids.len());
        for id in ids {
            if pending.insert(*id, kind).is_none() {
                held.push(*id);
            }
        }
        Ok(PendingGuard {
            gate: self.clone(),
            ids: held,
            kind,
        })
    }

    /// Kind of the enrichment in flight for `id`, if any
    pub fn pending_kind(&self, id: IdeaId) -> Option<EnrichmentKind> {
        self.lock().get(&id).copied()
    }

    pub fn is_pending(&self, id: IdeaId) -> bool {
        self.lock().contains_key(&id)
    }

    /// Snapshot of every pending idea
    pub fn pending(&self) -> Vec<(IdeaId, EnrichmentKind)> {
        let mut all: Vec<_> = self.lock().iter().map(|(id, kind)| (*id, *kind)).collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }
}

/// Holds ideas in `Pending` until dropped
#[derive(Debug)]
pub struct PendingGuard {
    gate: PendingGate,
    ids: Vec<IdeaId>,
    kind: EnrichmentKind,
}

impl PendingGuard {
    pub fn ids(&self) -> &[IdeaId] {
        &self.ids
    }

    pub fn kind(&self) -> EnrichmentKind {
        self.kind
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        debug!(ids = ?self.ids, kind = %self.kind, "PendingGuard::drop: releasing");
        let mut pending = self.gate.lock();
        for id in &self.ids {
            pending.remove(id);
        }
    }
}
