//! Response extraction and shape validation
//!
//! Model output is untrusted. It is parsed into loose `Raw*` records first so
//! that shape problems produce a readable message, then checked field by
//! field before becoming a domain type.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::EnrichmentError;
use crate::domain::{ExpandedData, IdeaDraft, RefinedFields};

/// Allowed number of tags on a generated or combined idea
pub const MIN_TAGS: usize = 2;
pub const MAX_TAGS: usize = 3;

/// Pull the JSON object out of a model response
///
/// Prefers a ```json fenced block, otherwise takes the outermost braces.
pub fn extract_json(raw: &str) -> Option<&str> {
    if let Some(start) = raw.find("```json")
        && let Some(end) = raw[start + 7..].find("```")
    {
        let json = raw[start + 7..start + 7 + end].trim();
        if json.starts_with('{') && json.ends_with('}') {
            return Some(json);
        }
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Extract and deserialize a JSON object from a model response
pub fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, EnrichmentError> {
    debug!(len = raw.len(), "parse_json: called");
    let json = extract_json(raw).ok_or_else(|| EnrichmentError::validation("response contains no JSON object"))?;
    serde_json::from_str(json).map_err(|e| EnrichmentError::validation(format!("malformed response: {}", e)))
}

/// Idea-shaped record as the model returns it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIdea {
    pub title: String,
    pub short_desc: String,
    pub long_desc: String,
    #[serde(default)]
    pub preview_points: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Generation response envelope
#[derive(Debug, Deserialize)]
pub struct RawBatch {
    pub ideas: Vec<RawIdea>,
}

/// Chat response envelope
#[derive(Debug, Deserialize)]
pub struct RawReply {
    pub response: String,
}

/// Refine-from-chat response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRefined {
    pub title: String,
    pub short_desc: String,
    pub long_desc: String,
    #[serde(default)]
    pub preview_points: Vec<String>,
}

fn require_text(field: &str, value: String) -> Result<String, EnrichmentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EnrichmentError::validation(format!("{} is empty", field)));
    }
    Ok(trimmed.to_string())
}

fn preview_pair(points: Vec<String>) -> Result<[String; 2], EnrichmentError> {
    let count = points.len();
    let pair: [String; 2] = points
        .try_into()
        .map_err(|_| EnrichmentError::validation(format!("expected 2 preview points, got {}", count)))?;
    let [first, second] = pair;
    Ok([require_text("previewPoints[0]", first)?, require_text("previewPoints[1]", second)?])
}

/// Check one idea-shaped record
pub fn validate_idea(raw: RawIdea) -> Result<IdeaDraft, EnrichmentError> {
    debug!(title = %raw.title, "validate_idea: called");
    let tag_count = raw.tags.len();
    if !(MIN_TAGS..=MAX_TAGS).contains(&tag_count) {
        return Err(EnrichmentError::validation(format!(
            "expected {}-{} tags, got {}",
            MIN_TAGS, MAX_TAGS, tag_count
        )));
    }
    let tags = raw
        .tags
        .into_iter()
        .map(|t| require_text("tag", t))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(IdeaDraft {
        title: require_text("title", raw.title)?,
        short_desc: require_text("shortDesc", raw.short_desc)?,
        long_desc: require_text("longDesc", raw.long_desc)?,
        preview_points: preview_pair(raw.preview_points)?,
        tags,
    })
}

/// Check a generated batch holds exactly `expected` valid ideas
pub fn validate_batch(raw: RawBatch, expected: usize) -> Result<Vec<IdeaDraft>, EnrichmentError> {
    debug!(count = raw.ideas.len(), %expected, "validate_batch: called");
    if raw.ideas.len() != expected {
        return Err(EnrichmentError::validation(format!(
            "expected {} ideas, got {}",
            expected,
            raw.ideas.len()
        )));
    }
    raw.ideas.into_iter().map(validate_idea).collect()
}

/// Check every section of an expansion has content
pub fn validate_expanded(data: ExpandedData) -> Result<ExpandedData, EnrichmentError> {
    debug!(title = %data.title, "validate_expanded: called");
    if data.description.trim().is_empty() {
        return Err(EnrichmentError::validation("description is empty"));
    }
    if let Some((heading, _)) = data.sections().into_iter().find(|(_, section)| section.is_blank()) {
        return Err(EnrichmentError::validation(format!("section '{}' is empty", heading)));
    }
    Ok(data)
}

pub fn validate_reply(raw: RawReply) -> Result<String, EnrichmentError> {
    require_text("response", raw.response)
}

pub fn validate_refined(raw: RawRefined) -> Result<RefinedFields, EnrichmentError> {
    debug!(title = %raw.title, "validate_refined: called");
    Ok(RefinedFields {
        title: require_text("title", raw.title)?,
        short_desc: require_text("shortDesc", raw.short_desc)?,
        long_desc: require_text("longDesc", raw.long_desc)?,
        preview_points: preview_pair(raw.preview_points)?,
    })
}
