//! Domain types for a brainstorming session

mod brief;
mod idea;

#[cfg(test)]
pub(crate) use idea::fixtures;

pub use brief::{Brief, BriefError, DEFAULT_LENS};
pub use idea::{ChatEntry, ChatSender, ExpandedData, Idea, IdeaDraft, IdeaId, IdeaPatch, RefinedFields, Section};
