//! Metadata extraction from scraped page text
//!
//! `MetadataExtractor::extract` prompts a [`TextGenerator`], pulls the first
//! fenced ```` ```json ```` block out of the response, parses it and checks it
//! against the metadata schema. Transient backend failures are retried with
//! backoff; everything else surfaces as one [`AiExtractionError`].

mod backend;
mod errors;
mod openai;
mod prompts;
mod retry;
mod schema;

pub use backend::{BackendError, TextGenerator};
pub use errors::AiExtractionError;
pub use openai::OpenAiGenerator;
pub use prompts::build_extraction_prompt;
pub use retry::{RetryExhausted, RetryPolicy, retry_with_backoff};
pub use schema::{
    ExtractedMetadata, JobFunction, JobType, Region, parse_date_posted, validate_metadata,
};

use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::debug;

use crate::config::ExtractorConfig;

static JSON_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?i:json)\b[ \t]*\r?\n?(.*?)```").expect("JSON_BLOCK: hardcoded regex is valid")
});

/// Contents of the first ```` ```json ```` fenced block in `text`.
#[must_use]
pub fn extract_json_block(text: &str) -> Option<&str> {
    JSON_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Turn a raw backend response into validated metadata.
pub fn parse_response(raw_response: String) -> Result<ExtractedMetadata, AiExtractionError> {
    let Some(block) = extract_json_block(&raw_response) else {
        return Err(AiExtractionError::MissingJsonBlock { raw_response });
    };

    let value: Value = match serde_json::from_str(block) {
        Ok(value) => value,
        Err(source) => {
            return Err(AiExtractionError::InvalidJson {
                raw_response,
                source,
            });
        }
    };

    validate_metadata(&value).map_err(|violations| AiExtractionError::SchemaViolation {
        raw_response,
        violations,
    })
}

/// Prompts the backend and validates what comes back.
#[derive(Clone)]
pub struct MetadataExtractor {
    generator: Arc<dyn TextGenerator>,
    policy: RetryPolicy,
    backend_timeout: Duration,
    max_prompt_chars: usize,
}

impl std::fmt::Debug for MetadataExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataExtractor")
            .field("policy", &self.policy)
            .field("backend_timeout", &self.backend_timeout)
            .field("max_prompt_chars", &self.max_prompt_chars)
            .finish_non_exhaustive()
    }
}

impl MetadataExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &ExtractorConfig) -> Self {
        Self {
            generator,
            policy: RetryPolicy::from_config(config),
            backend_timeout: config.backend_timeout(),
            max_prompt_chars: config.max_prompt_chars(),
        }
    }

    /// Replace the retry policy derived from the config.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Extract job metadata from rendered page text.
    ///
    /// Each backend attempt is bounded by the backend timeout. A timeout on the
    /// last attempt is reported as [`AiExtractionError::Timeout`].
    pub async fn extract(&self, page_text: &str) -> Result<ExtractedMetadata, AiExtractionError> {
        let prompt = build_extraction_prompt(page_text, self.max_prompt_chars);
        let prompt = prompt.as_str();
        let generator = &self.generator;
        let timeout = self.backend_timeout;

        let raw_response = retry_with_backoff(&self.policy, move || async move {
            match tokio::time::timeout(timeout, generator.generate(prompt)).await {
                Ok(result) => result,
                Err(_) => Err(BackendError::Timeout(timeout)),
            }
        })
        .await
        .map_err(|RetryExhausted { error, attempts }| match error {
            BackendError::Timeout(timeout) => AiExtractionError::Timeout { timeout, attempts },
            source => AiExtractionError::Backend { attempts, source },
        })?;

        debug!(chars = raw_response.len(), "Parsing backend response");
        parse_response(raw_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"Here you go:
```json
{"jobTitle": "Rust Engineer", "companyName": "Acme", "location": "Europe",
 "jobFunction": "engineering", "jobType": "Full-time", "datePosted": "2024-05-01"}
```
Anything else?"#;

    #[test]
    fn finds_first_json_block() {
        let text = "```json\n{\"a\": 1}\n```\n```json\n{\"b\": 2}\n```";
        assert_eq!(extract_json_block(text), Some("{\"a\": 1}"));
        assert_eq!(extract_json_block("```JSON {\"c\": 3}```"), Some("{\"c\": 3}"));
        assert_eq!(extract_json_block("{\"a\": 1}"), None);
        assert_eq!(extract_json_block("```\n{\"a\": 1}\n```"), None);
    }

    #[test]
    fn other_json_dialect_fences_are_ignored() {
        assert_eq!(extract_json_block("```jsonc\n{\"a\": 1}\n```"), None);
        assert_eq!(extract_json_block("```json5\n{a: 1}\n```"), None);

        let text = "```jsonc\n// note\n{}\n```\n```json\n{\"b\": 2}\n```";
        assert_eq!(extract_json_block(text), Some("{\"b\": 2}"));
    }

    #[test]
    fn parses_valid_response() {
        let metadata = parse_response(VALID.to_string()).unwrap();
        assert_eq!(metadata.job_title, "Rust Engineer");
        assert_eq!(metadata.location, Region::Europe);
        assert_eq!(metadata.job_function, JobFunction::Engineering);
        assert_eq!(metadata.job_type, JobType::FullTime);
        assert_eq!(metadata.date_posted.to_string(), "2024-05-01");
    }

    #[test]
    fn missing_block_keeps_raw_response() {
        let err = parse_response("no json here".to_string()).unwrap_err();
        assert!(matches!(err, AiExtractionError::MissingJsonBlock { .. }));
        assert_eq!(err.raw_response(), Some("no json here"));
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = parse_response("```json\n{not json}\n```".to_string()).unwrap_err();
        assert!(matches!(err, AiExtractionError::InvalidJson { .. }));
        assert!(err.raw_response().is_some());
    }

    #[test]
    fn schema_violations_are_reported() {
        let raw = "```json\n{\"jobTitle\": \"x\", \"location\": \"MARS\"}\n```".to_string();
        let AiExtractionError::SchemaViolation { violations, .. } = parse_response(raw).unwrap_err()
        else {
            panic!("expected a schema violation");
        };
        assert!(violations.iter().any(|v| v.contains("MARS")));
        assert!(violations.iter().any(|v| v.contains("companyName")));
    }
}
