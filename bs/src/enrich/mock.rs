//! Scripted EnrichmentService for controller and session tests

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::debug;

use super::{EnrichmentError, EnrichmentKind, EnrichmentOutput, EnrichmentRequest, EnrichmentService};
use crate::domain::{Brief, IdeaDraft, RefinedFields, fixtures};

/// Mock enrichment service
///
/// Queued results are returned in order; once the queue is empty every call
/// succeeds with a plausible default. When held, each `invoke` waits for a
/// permit on the returned semaphore before answering, so tests can observe
/// the pending state and release calls one at a time.
#[derive(Default)]
pub struct MockEnrichmentService {
    results: Mutex<VecDeque<Result<EnrichmentOutput, EnrichmentError>>>,
    batches: Mutex<VecDeque<Result<Vec<IdeaDraft>, EnrichmentError>>>,
    hold: Option<Arc<Semaphore>>,
    calls: AtomicUsize,
    kinds: Mutex<Vec<EnrichmentKind>>,
}

impl MockEnrichmentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `invoke` blocks until a permit is added to the returned semaphore
    pub fn held() -> (Self, Arc<Semaphore>) {
        let release = Arc::new(Semaphore::new(0));
        let mock = Self {
            hold: Some(release.clone()),
            ..Self::default()
        };
        (mock, release)
    }

    pub fn push_result(&self, result: Result<EnrichmentOutput, EnrichmentError>) {
        if let Ok(mut results) = self.results.lock() {
            results.push_back(result);
        }
    }

    pub fn push_failure(&self, message: &str) {
        self.push_result(Err(EnrichmentError::Service(crate::llm::LlmError::InvalidResponse(
            message.to_string(),
        ))));
    }

    pub fn push_batch(&self, batch: Result<Vec<IdeaDraft>, EnrichmentError>) {
        if let Ok(mut batches) = self.batches.lock() {
            batches.push_back(batch);
        }
    }

    /// Number of `invoke` calls so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn kinds(&self) -> Vec<EnrichmentKind> {
        self.kinds.lock().map(|k| k.clone()).unwrap_or_default()
    }

    fn default_output(request: &EnrichmentRequest) -> EnrichmentOutput {
        match request {
            EnrichmentRequest::Expand { idea, .. } => EnrichmentOutput::Expanded(fixtures::expanded(&idea.title)),
            EnrichmentRequest::Chat { message, .. } => EnrichmentOutput::Reply(format!("re: {}", message)),
            EnrichmentRequest::Combine { first, second } => {
                EnrichmentOutput::Combined(fixtures::draft(&format!("{} + {}", first.title, second.title)))
            }
            EnrichmentRequest::Refine { idea } => EnrichmentOutput::Refined(RefinedFields {
                title: format!("{} (refined)", idea.title),
                short_desc: idea.short_desc.clone(),
                long_desc: idea.long_desc.clone(),
                preview_points: idea.preview_points.clone(),
            }),
        }
    }
}

#[async_trait]
impl EnrichmentService for MockEnrichmentService {
    async fn generate(&self, brief: &Brief) -> Result<Vec<IdeaDraft>, EnrichmentError> {
        debug!(subject = %brief.subject, "MockEnrichmentService::generate: called");
        let queued = self.batches.lock().ok().and_then(|mut b| b.pop_front());
        queued.unwrap_or_else(|| Ok((1..=4).map(|i| fixtures::draft(&format!("Idea {}", i))).collect()))
    }

    async fn invoke(&self, request: EnrichmentRequest) -> Result<EnrichmentOutput, EnrichmentError> {
        debug!(kind = %request.kind(), "MockEnrichmentService::invoke: called");
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut kinds) = self.kinds.lock() {
            kinds.push(request.kind());
        }

        if let Some(hold) = &self.hold
            && let Ok(permit) = hold.acquire().await
        {
            permit.forget();
        }

        let queued = self.results.lock().ok().and_then(|mut r| r.pop_front());
        queued.unwrap_or_else(|| Ok(Self::default_output(&request)))
    }
}
