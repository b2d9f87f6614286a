//! Generative text backend seam

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::error::BoxError;

/// Prompt in, response text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to backend failed: {source}")]
    Transport {
        #[source]
        source: BoxError,
    },

    #[error("backend rate limited the request")]
    RateLimited { retry_after: Option<Duration> },

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("backend call timed out after {0:?}")]
    Timeout(Duration),

    #[error("backend returned an empty response")]
    EmptyResponse,

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("backend is misconfigured: {0}")]
    Config(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        BackendError::Transport {
            source: Box::new(error),
        }
    }
}

impl BackendError {
    /// Check if error is transient and should be retried
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::Transport { .. }
            | BackendError::RateLimited { .. }
            | BackendError::Timeout(_) => true,
            BackendError::Status { status, .. } => *status >= 500,
            BackendError::EmptyResponse
            | BackendError::MalformedResponse(_)
            | BackendError::Config(_) => false,
        }
    }

    /// Server-requested delay before the next attempt
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            BackendError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(BackendError::RateLimited { retry_after: None }.is_transient());
        assert!(BackendError::Timeout(Duration::from_secs(1)).is_transient());
        assert!(
            BackendError::Status {
                status: 503,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            !BackendError::Status {
                status: 401,
                body: String::new()
            }
            .is_transient()
        );
        assert!(!BackendError::EmptyResponse.is_transient());
    }
}
