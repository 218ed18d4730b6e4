//! Idea domain types
//!
//! An `Idea` is one brainstormed concept. Ideas are created from AI-shaped
//! `IdeaDraft` records, get an id assigned by the store, and are then enriched
//! in place through `IdeaPatch` merges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session-unique idea identifier
///
/// Assigned by the store from a monotonic counter. Never reused, not even
/// after a full reset of the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdeaId(pub u64);

impl fmt::Display for IdeaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IdeaId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(IdeaId)
    }
}

/// Who wrote a chat entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    User,
    Ai,
}

/// One message in an idea's refinement conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub sender: ChatSender,
    pub text: String,
}

impl ChatEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: ChatSender::User,
            text: text.into(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            sender: ChatSender::Ai,
            text: text.into(),
        }
    }
}

/// One categorized section of an expansion: either prose or a list of points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Section {
    Points(Vec<String>),
    Prose(String),
}

impl Section {
    /// True when the section carries no usable content
    pub fn is_blank(&self) -> bool {
        match self {
            Section::Points(points) => points.iter().all(|p| p.trim().is_empty()),
            Section::Prose(text) => text.trim().is_empty(),
        }
    }
}

/// Structured elaboration of an idea produced by an expand call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedData {
    /// Echo of the idea title
    pub title: String,
    pub description: String,
    pub core_features: Section,
    pub audience_fit: Section,
    pub roadmap: Section,
    pub monetization: Section,
    pub challenges: Section,
    pub growth_opportunities: Section,
}

impl ExpandedData {
    /// Sections in display order, paired with their headings
    pub fn sections(&self) -> [(&'static str, &Section); 6] {
        [
            ("Core features", &self.core_features),
            ("Audience fit", &self.audience_fit),
            ("Roadmap", &self.roadmap),
            ("Monetization", &self.monetization),
            ("Challenges", &self.challenges),
            ("Growth opportunities", &self.growth_opportunities),
        ]
    }
}

/// AI-shaped idea record, before the store assigns an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaDraft {
    pub title: String,
    pub short_desc: String,
    pub long_desc: String,
    pub preview_points: [String; 2],
    pub tags: Vec<String>,
}

/// Idea fields produced by refining an idea from its chat history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinedFields {
    pub title: String,
    pub short_desc: String,
    pub long_desc: String,
    pub preview_points: [String; 2],
}

/// A brainstormed concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: IdeaId,
    pub title: String,
    pub short_desc: String,
    pub long_desc: String,
    pub preview_points: [String; 2],
    pub tags: Vec<String>,
    pub likes: u64,
    pub is_favorited: bool,
    pub expanded_data: Option<ExpandedData>,
    pub chat_history: Vec<ChatEntry>,
    /// Creation timestamp (milliseconds since Unix epoch)
    pub created_at: i64,
}

impl Idea {
    /// Materialize a draft under a freshly assigned id
    pub fn from_draft(id: IdeaId, draft: IdeaDraft) -> Self {
        debug!(%id, title = %draft.title, "Idea::from_draft: called");
        Self {
            id,
            title: draft.title,
            short_desc: draft.short_desc,
            long_desc: draft.long_desc,
            preview_points: draft.preview_points,
            tags: draft.tags,
            likes: 0,
            is_favorited: false,
            expanded_data: None,
            chat_history: Vec::new(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded_data.is_some()
    }

    /// The AI-facing content of this idea, without session bookkeeping
    pub fn to_draft(&self) -> IdeaDraft {
        IdeaDraft {
            title: self.title.clone(),
            short_desc: self.short_desc.clone(),
            long_desc: self.long_desc.clone(),
            preview_points: self.preview_points.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Partial update merged into an idea by id
///
/// Applied as a whole by the store; `expanded_data` only lands when the idea
/// has none yet, since an expansion is never replaced once present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaPatch {
    pub title: Option<String>,
    pub short_desc: Option<String>,
    pub long_desc: Option<String>,
    pub preview_points: Option<[String; 2]>,
    pub expanded_data: Option<ExpandedData>,
    pub append_chat: Vec<ChatEntry>,
}

impl IdeaPatch {
    pub fn expanded(data: ExpandedData) -> Self {
        Self {
            expanded_data: Some(data),
            ..Default::default()
        }
    }

    /// Append one user/ai exchange to the chat history
    pub fn chat_exchange(message: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            append_chat: vec![ChatEntry::user(message), ChatEntry::ai(response)],
            ..Default::default()
        }
    }

    pub fn refined(fields: RefinedFields) -> Self {
        Self {
            title: Some(fields.title),
            short_desc: Some(fields.short_desc),
            long_desc: Some(fields.long_desc),
            preview_points: Some(fields.preview_points),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge this patch into `idea`
    pub fn apply(self, idea: &mut Idea) {
        debug!(id = %idea.id, "IdeaPatch::apply: called");
        if let Some(title) = self.title {
            idea.title = title;
        }
        if let Some(short_desc) = self.short_desc {
            idea.short_desc = short_desc;
        }
        if let Some(long_desc) = self.long_desc {
            idea.long_desc = long_desc;
        }
        if let Some(points) = self.preview_points {
            idea.preview_points = points;
        }
        if let Some(data) = self.expanded_data {
            if idea.expanded_data.is_none() {
                idea.expanded_data = Some(data);
            } else {
                debug!(id = %idea.id, "IdeaPatch::apply: expansion already present, keeping it");
            }
        }
        idea.chat_history.extend(self.append_chat);
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn draft(title: &str) -> IdeaDraft {
        IdeaDraft {
            title: title.to_string(),
            short_desc: format!("{} in one line", title),
            long_desc: format!("{} explained at length", title),
            preview_points: [format!("{} point one", title), format!("{} point two", title)],
            tags: vec!["team".to_string(), "offsite".to_string()],
        }
    }

    pub fn expanded(title: &str) -> ExpandedData {
        ExpandedData {
            title: title.to_string(),
            description: format!("{} in depth", title),
            core_features: Section::Points(vec!["one".to_string(), "two".to_string()]),
            audience_fit: Section::Prose("Distributed teams".to_string()),
            roadmap: Section::Points(vec!["pilot".to_string(), "launch".to_string()]),
            monetization: Section::Prose("Per-seat pricing".to_string()),
            challenges: Section::Points(vec!["time zones".to_string()]),
            growth_opportunities: Section::Prose("Partner venues".to_string()),
        }
    }
}
