use std::time::Duration;
use thiserror::Error;

use super::backend::BackendError;

/// Failure to turn page text into validated metadata.
///
/// Variants raised after the backend answered keep the raw response for
/// diagnostics.
#[derive(Debug, Error)]
pub enum AiExtractionError {
    #[error("backend call failed after {attempts} attempt(s): {source}")]
    Backend {
        attempts: u32,
        #[source]
        source: BackendError,
    },

    #[error("backend call timed out after {timeout:?} ({attempts} attempt(s))")]
    Timeout { timeout: Duration, attempts: u32 },

    #[error("backend response contained no ```json block")]
    MissingJsonBlock { raw_response: String },

    #[error("```json block is not valid JSON: {source}")]
    InvalidJson {
        raw_response: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("extracted metadata failed validation: {}", .violations.join("; "))]
    SchemaViolation {
        raw_response: String,
        violations: Vec<String>,
    },
}

impl AiExtractionError {
    /// Backend response text, when one was received.
    #[must_use]
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::MissingJsonBlock { raw_response }
            | Self::InvalidJson { raw_response, .. }
            | Self::SchemaViolation { raw_response, .. } => Some(raw_response),
            Self::Backend { .. } | Self::Timeout { .. } => None,
        }
    }
}
