//! Shared HTTP plumbing for provider clients
//!
//! Transport-level retry with exponential backoff for transient statuses.
//! This is the only retry in the system: failures that survive it surface
//! to the user, who re-triggers manually.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, warn};

use super::LlmError;

/// Maximum number of retries for transient errors
pub(crate) const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
pub(crate) const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 500 | 502 | 503 | 504 | 529)
}

/// Build a reqwest client with the configured timeout
pub(crate) fn build_client(timeout: Duration) -> Result<Client, LlmError> {
    Client::builder().timeout(timeout).build().map_err(LlmError::Network)
}

/// Send a request built by `build`, retrying transient failures
///
/// `build` is called once per attempt since a `RequestBuilder` is consumed
/// by sending it. Returns the first successful response.
pub(crate) async fn send_with_retry(
    build: impl Fn() -> RequestBuilder,
    timeout: Duration,
) -> Result<Response, LlmError> {
    let mut last_error = None;
    for attempt in 0..=MAX_RETRIES {
        if attempt > 0 {
            let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
            warn!(attempt, backoff_ms = backoff, "send_with_retry: retrying after transient error");
            tokio::time::sleep(Duration::from_millis(backoff)).await;
        }

        let response = match build().send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                debug!(attempt, "send_with_retry: request timed out");
                last_error = Some(LlmError::Timeout(timeout));
                continue;
            }
            Err(e) => {
                debug!(attempt, error = %e, "send_with_retry: network error");
                last_error = Some(LlmError::Network(e));
                continue;
            }
        };

        let status = response.status().as_u16();

        if status == 429 {
            debug!("send_with_retry: rate limited (429)");
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if is_retryable_status(status) && attempt < MAX_RETRIES {
            let text = response.text().await.unwrap_or_default();
            debug!(attempt, status, "send_with_retry: retryable error");
            last_error = Some(LlmError::ApiError { status, message: text });
            continue;
        }

        if !response.status().is_success() {
            debug!(%status, "send_with_retry: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message: text });
        }

        return Ok(response);
    }

    Err(last_error.unwrap_or_else(|| LlmError::InvalidResponse("Max retries exceeded".to_string())))
}
