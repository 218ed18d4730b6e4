//! Idea store with actor pattern
//!
//! IdeaStore owns the idea collection and the combine selection and processes
//! messages via channels. It is the single writer for all idea records.

mod collection;
mod manager;
mod messages;

pub use collection::IdeaCollection;
pub use manager::{IdeaStore, StoreEvent};
pub use messages::{StoreCommand, StoreError, StoreResponse};
