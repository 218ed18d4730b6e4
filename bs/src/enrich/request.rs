//! Typed enrichment requests and results
//!
//! Every request carries full idea records by value, so the records cannot
//! change under an in-flight call.

use std::fmt;

use serde::Serialize;

use crate::domain::{Brief, ExpandedData, Idea, IdeaDraft, IdeaId, RefinedFields};

/// Which enrichment operation is in flight for an idea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentKind {
    Expand,
    Chat,
    Combine,
    Refine,
}

impl fmt::Display for EnrichmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnrichmentKind::Expand => "expand",
            EnrichmentKind::Chat => "chat",
            EnrichmentKind::Combine => "combine",
            EnrichmentKind::Refine => "refine",
        };
        write!(f, "{}", name)
    }
}

/// Input to a single enrichment call
#[derive(Debug, Clone)]
pub enum EnrichmentRequest {
    /// Elaborate an idea into `ExpandedData`
    Expand { idea: Idea, brief: Brief },
    /// One conversational turn about an idea
    Chat { idea: Idea, message: String },
    /// Merge two ideas into a new one
    Combine { first: Idea, second: Idea },
    /// Rewrite an idea's top-level fields from its chat history
    Refine { idea: Idea },
}

impl EnrichmentRequest {
    pub fn kind(&self) -> EnrichmentKind {
        match self {
            EnrichmentRequest::Expand { .. } => EnrichmentKind::Expand,
            EnrichmentRequest::Chat { .. } => EnrichmentKind::Chat,
            EnrichmentRequest::Combine { .. } => EnrichmentKind::Combine,
            EnrichmentRequest::Refine { .. } => EnrichmentKind::Refine,
        }
    }

    /// Ids of the ideas this request is about
    pub fn idea_ids(&self) -> Vec<IdeaId> {
        match self {
            EnrichmentRequest::Expand { idea, .. }
            | EnrichmentRequest::Chat { idea, .. }
            | EnrichmentRequest::Refine { idea } => vec![idea.id],
            EnrichmentRequest::Combine { first, second } => vec![first.id, second.id],
        }
    }
}

/// Validated result of an enrichment call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutput {
    Expanded(ExpandedData),
    Reply(String),
    Combined(IdeaDraft),
    Refined(RefinedFields),
}

impl EnrichmentOutput {
    pub fn kind(&self) -> EnrichmentKind {
        match self {
            EnrichmentOutput::Expanded(_) => EnrichmentKind::Expand,
            EnrichmentOutput::Reply(_) => EnrichmentKind::Chat,
            EnrichmentOutput::Combined(_) => EnrichmentKind::Combine,
            EnrichmentOutput::Refined(_) => EnrichmentKind::Refine,
        }
    }
}
