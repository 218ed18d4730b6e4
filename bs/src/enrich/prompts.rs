//! Prompt templates
//!
//! Compiled into the binary from .pmt files and rendered with Handlebars.

use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::EnrichmentError;
use crate::domain::{Brief, ChatEntry, Idea};

/// Shared system prompt
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");

pub const GENERATE: &str = include_str!("../../prompts/generate.pmt");
pub const EXPAND: &str = include_str!("../../prompts/expand.pmt");
pub const CHAT: &str = include_str!("../../prompts/chat.pmt");
pub const COMBINE: &str = include_str!("../../prompts/combine.pmt");
pub const REFINE: &str = include_str!("../../prompts/refine.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "system" => Some(SYSTEM),
        "generate" => Some(GENERATE),
        "expand" => Some(EXPAND),
        "chat" => Some(CHAT),
        "combine" => Some(COMBINE),
        "refine" => Some(REFINE),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateContext<'a> {
    pub brief: &'a Brief,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ExpandContext {
    pub idea: String,
    pub brief: String,
}

#[derive(Debug, Serialize)]
pub struct ChatContext<'a> {
    pub idea: String,
    pub history: &'a [ChatEntry],
    pub message: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CombineContext {
    pub first: String,
    pub second: String,
}

#[derive(Debug, Serialize)]
pub struct RefineContext<'a> {
    pub idea: String,
    pub history: &'a [ChatEntry],
}

/// Idea content as pretty JSON for embedding in a prompt
///
/// Session bookkeeping (likes, chat, timestamps) is left out.
pub fn idea_json(idea: &Idea) -> String {
    serde_json::to_string_pretty(&idea.to_draft()).unwrap_or_else(|_| idea.title.clone())
}

pub fn brief_json(brief: &Brief) -> String {
    serde_json::to_string_pretty(brief).unwrap_or_else(|_| brief.subject.clone())
}

/// Renders embedded templates
pub struct PromptLoader {
    hbs: Handlebars<'static>,
}

impl PromptLoader {
    pub fn new() -> Self {
        debug!("PromptLoader::new: called");
        let mut hbs = Handlebars::new();
        // Prompts are plain text, not HTML
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs }
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String, EnrichmentError> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = get_embedded(template_name)
            .ok_or_else(|| EnrichmentError::Prompt(format!("Prompt template not found: {}", template_name)))?;
        self.hbs
            .render_template(template, context)
            .map_err(|e| EnrichmentError::Prompt(format!("Failed to render template {}: {}", template_name, e)))
    }

    pub fn system_prompt(&self) -> &'static str {
        SYSTEM
    }
}

impl Default for PromptLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IdeaId, fixtures};

    #[test]
    fn test_get_embedded() {
        for name in ["system", "generate", "expand", "chat", "combine", "refine"] {
            assert!(get_embedded(name).is_some(), "missing {}", name);
        }
        assert!(get_embedded("nonexistent").is_none());
    }

    #[test]
    fn test_render_generate_with_optional_fields() {
        let loader = PromptLoader::new();
        let brief = Brief::new("retreat", "remote employees", "What If?").with_constraints("under $500 per head");
        let prompt = loader
            .render("generate", &GenerateContext { brief: &brief, count: 4 })
            .unwrap();

        assert!(prompt.contains("Subject: retreat"));
        assert!(prompt.contains("Constraints: under $500 per head"));
        assert!(!prompt.contains("Other notes"));
        assert!(prompt.contains("exactly 4 entries"));
    }

    #[test]
    fn test_render_does_not_html_escape() {
        let loader = PromptLoader::new();
        let brief = Brief::new("R&D \"labs\"", "engineers", "What If?");
        let prompt = loader
            .render("generate", &GenerateContext { brief: &brief, count: 4 })
            .unwrap();
        assert!(prompt.contains("R&D \"labs\""));
    }

    #[test]
    fn test_render_chat_includes_history() {
        let loader = PromptLoader::new();
        let idea = Idea::from_draft(IdeaId(1), fixtures::draft("Retreat"));
        let history = vec![ChatEntry::user("cheaper?"), ChatEntry::ai("Drop the venue")];
        let prompt = loader
            .render(
                "chat",
                &ChatContext {
                    idea: idea_json(&idea),
                    history: &history,
                    message: "what about food",
                },
            )
            .unwrap();

        assert!(prompt.contains("user: cheaper?"));
        assert!(prompt.contains("ai: Drop the venue"));
        assert!(prompt.contains("what about food"));
        assert!(prompt.contains("\"shortDesc\""));
        assert!(!prompt.contains("likes"));
    }

    #[test]
    fn test_render_unknown_template() {
        let loader = PromptLoader::new();
        let err = loader.render("nope", &serde_json::json!({})).unwrap_err();
        assert!(matches!(err, EnrichmentError::Prompt(_)));
    }
}
