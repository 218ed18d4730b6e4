//! EnrichmentService backed by an LlmClient

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::prompts::{
    ChatContext, CombineContext, ExpandContext, GenerateContext, PromptLoader, RefineContext, brief_json, idea_json,
};
use super::validate::{self, RawBatch, RawIdea, RawRefined, RawReply};
use super::{EnrichmentError, EnrichmentOutput, EnrichmentRequest, EnrichmentService};
use crate::config::{LlmConfig, SessionConfig};
use crate::domain::{Brief, ExpandedData, IdeaDraft};
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message, StopReason};

/// Prompts each operation through the configured model and validates the JSON it returns
pub struct LlmEnrichmentService {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    idea_count: usize,
    chat_context_limit: usize,
    max_tokens: u32,
}

impl LlmEnrichmentService {
    pub fn new(llm: Arc<dyn LlmClient>, llm_config: &LlmConfig, session: &SessionConfig) -> Self {
        debug!(idea_count = session.idea_count, "LlmEnrichmentService::new: called");
        Self {
            llm,
            prompts: PromptLoader::new(),
            idea_count: session.idea_count,
            chat_context_limit: session.chat_context_limit,
            max_tokens: llm_config.max_tokens,
        }
    }

    /// Render a template, call the model once, and deserialize its JSON answer
    async fn complete_json<C: Serialize, T: DeserializeOwned>(
        &self,
        template: &str,
        context: &C,
    ) -> Result<T, EnrichmentError> {
        debug!(%template, "complete_json: called");
        let prompt = self.prompts.render(template, context)?;
        let request = CompletionRequest {
            system_prompt: self.prompts.system_prompt().to_string(),
            messages: vec![Message::user(prompt)],
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(request).await?;
        info!(
            %template,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "completion received"
        );

        if response.stop_reason == StopReason::MaxTokens {
            warn!(%template, "complete_json: response truncated at max tokens");
            return Err(EnrichmentError::validation("response was truncated"));
        }
        let text = response
            .content
            .ok_or_else(|| EnrichmentError::Service(LlmError::InvalidResponse("empty response".to_string())))?;

        validate::parse_json(&text)
    }
}

#[async_trait]
impl EnrichmentService for LlmEnrichmentService {
    async fn generate(&self, brief: &Brief) -> Result<Vec<IdeaDraft>, EnrichmentError> {
        debug!(subject = %brief.subject, "generate: called");
        brief
            .validate()
            .map_err(|e| EnrichmentError::validation(e.to_string()))?;

        let context = GenerateContext {
            brief,
            count: self.idea_count,
        };
        let batch: RawBatch = self.complete_json("generate", &context).await?;
        validate::validate_batch(batch, self.idea_count)
    }

    async fn invoke(&self, request: EnrichmentRequest) -> Result<EnrichmentOutput, EnrichmentError> {
        debug!(kind = %request.kind(), ids = ?request.idea_ids(), "invoke: called");
        match request {
            EnrichmentRequest::Expand { idea, brief } => {
                let context = ExpandContext {
                    idea: idea_json(&idea),
                    brief: brief_json(&brief),
                };
                let data: ExpandedData = self.complete_json("expand", &context).await?;
                validate::validate_expanded(data).map(EnrichmentOutput::Expanded)
            }
            EnrichmentRequest::Chat { idea, message } => {
                let start = idea.chat_history.len().saturating_sub(self.chat_context_limit);
                let context = ChatContext {
                    idea: idea_json(&idea),
                    history: &idea.chat_history[start..],
                    message: &message,
                };
                let reply: RawReply = self.complete_json("chat", &context).await?;
                validate::validate_reply(reply).map(EnrichmentOutput::Reply)
            }
            EnrichmentRequest::Combine { first, second } => {
                let context = CombineContext {
                    first: idea_json(&first),
                    second: idea_json(&second),
                };
                let raw: RawIdea = self.complete_json("combine", &context).await?;
                validate::validate_idea(raw).map(EnrichmentOutput::Combined)
            }
            EnrichmentRequest::Refine { idea } => {
                if idea.chat_history.is_empty() {
                    return Err(EnrichmentError::validation("no conversation to refine from"));
                }
                let context = RefineContext {
                    idea: idea_json(&idea),
                    history: &idea.chat_history,
                };
                let raw: RawRefined = self.complete_json("refine", &context).await?;
                validate::validate_refined(raw).map(EnrichmentOutput::Refined)
            }
        }
    }
}
