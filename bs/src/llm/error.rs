//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// True when the same request may succeed if sent again later
    ///
    /// Client errors other than 429 and anything about the response body or
    /// local configuration will fail the same way every time.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } | LlmError::Network(_) | LlmError::Timeout(_) => true,
            LlmError::ApiError { status, .. } => *status >= 500,
            LlmError::InvalidResponse(_) | LlmError::Json(_) | LlmError::Config(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_failures() {
        let quota = LlmError::RateLimited {
            retry_after: Duration::from_secs(30),
        };
        let overloaded = LlmError::ApiError {
            status: 529,
            message: "overloaded".to_string(),
        };
        assert!(quota.is_transient());
        assert!(overloaded.is_transient());
        assert!(LlmError::Timeout(Duration::from_secs(120)).is_transient());
    }

    #[test]
    fn test_permanent_failures() {
        let bad_key = LlmError::ApiError {
            status: 401,
            message: "invalid x-api-key".to_string(),
        };
        assert!(!bad_key.is_transient());
        assert!(!LlmError::InvalidResponse("no text block".to_string()).is_transient());
        assert!(!LlmError::Config("ANTHROPIC_API_KEY not set".to_string()).is_transient());
    }
}
