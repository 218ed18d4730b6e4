//! Per-idea enrichment controller
//!
//! Enforces the Idle/Pending gate per idea id, runs enrichment calls as
//! detached tasks, and merges results into the idea store.

mod error;
mod gate;
mod manager;

pub use error::ControllerError;
pub use gate::{PendingGate, PendingGuard};
pub use manager::{ControllerEvent, EnrichmentController, EnrichmentOutcome, IdeaAction};
