//! Session lifecycle
//!
//! `Input → Results → Finalized`, with start over returning to `Input` from
//! anywhere. Within `Results` at most one idea is shown in a dialog.

mod action;
mod coordinator;
mod error;

pub use action::{ActionOutcome, ActiveDialog, DialogMode, DialogView, SessionAction};
pub use coordinator::{Session, SessionPhase};
pub use error::SessionError;
