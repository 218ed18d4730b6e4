//! Brainstorming brief
//!
//! The user's input for idea generation. Also sent along with every expand
//! call so the elaboration stays on topic.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Lens used when none is given
pub const DEFAULT_LENS: &str = "What If?";

/// Errors from validating a brief
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BriefError {
    #[error("Brief is missing a {0}")]
    MissingField(&'static str),
}

/// The brainstorming brief that seeds a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brief {
    pub subject: String,
    pub audience: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
    pub lens: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_description: Option<String>,
}

impl Brief {
    pub fn new(subject: impl Into<String>, audience: impl Into<String>, lens: impl Into<String>) -> Self {
        let subject = subject.into();
        debug!(%subject, "Brief::new: called");
        Self {
            subject,
            audience: audience.into(),
            constraints: None,
            other: None,
            lens: lens.into(),
            detailed_description: None,
        }
    }

    /// Builder: set constraints
    pub fn with_constraints(mut self, constraints: impl Into<String>) -> Self {
        self.constraints = Some(constraints.into());
        self
    }

    /// Builder: set free-form extra notes
    pub fn with_other(mut self, other: impl Into<String>) -> Self {
        self.other = Some(other.into());
        self
    }

    /// Builder: set the detailed description
    pub fn with_detailed_description(mut self, description: impl Into<String>) -> Self {
        self.detailed_description = Some(description.into());
        self
    }

    /// Check the required fields are filled in
    pub fn validate(&self) -> Result<(), BriefError> {
        if self.subject.trim().is_empty() {
            return Err(BriefError::MissingField("subject"));
        }
        if self.audience.trim().is_empty() {
            return Err(BriefError::MissingField("audience"));
        }
        if self.lens.trim().is_empty() {
            return Err(BriefError::MissingField("lens"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_subject_and_audience() {
        assert!(Brief::new("retreat", "remote employees", DEFAULT_LENS).validate().is_ok());
        assert_eq!(
            Brief::new(" ", "remote employees", DEFAULT_LENS).validate(),
            Err(BriefError::MissingField("subject"))
        );
        assert_eq!(
            Brief::new("retreat", "", DEFAULT_LENS).validate(),
            Err(BriefError::MissingField("audience"))
        );
    }

    #[test]
    fn test_optional_fields_skipped_when_serialized() {
        let brief = Brief::new("retreat", "remote employees", "What If?").with_constraints("under $500");
        let json = serde_json::to_value(&brief).unwrap();
        assert_eq!(json["constraints"], "under $500");
        assert!(json.get("other").is_none());
        assert!(json.get("detailedDescription").is_none());
    }
}
