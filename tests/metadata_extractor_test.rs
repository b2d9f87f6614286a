//! Extractor behaviour against the scripted backend

use std::sync::Arc;
use std::time::Duration;

use jobscrape::metadata_extractor::{BackendError, MetadataExtractor, RetryPolicy};
use jobscrape::testing::{MockBackendError, MockResponse, MockTextGenerator, metadata_response};
use jobscrape::{AiExtractionError, JobFunction, JobType, Region};

mod common;

fn extractor(generator: &MockTextGenerator) -> MetadataExtractor {
    MetadataExtractor::new(Arc::new(generator.clone()), common::fast_config().extractor())
}

fn fast_retries(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_delay: Duration::from_millis(1),
        backoff_multiplier: 2.0,
        max_delay: Duration::from_millis(5),
    }
}

#[tokio::test]
async fn test_extracts_metadata_from_fenced_block() {
    let generator = MockTextGenerator::new().with_default(MockResponse::Text(metadata_response(
        "Data Engineer",
        "Globex",
    )));

    let metadata = extractor(&generator)
        .extract("Data Engineer at Globex, remote, full time")
        .await
        .unwrap();

    assert_eq!(metadata.job_title, "Data Engineer");
    assert_eq!(metadata.company_name, "Globex");
    assert_eq!(metadata.location, Region::Remote);
    assert_eq!(metadata.job_function, JobFunction::Engineering);
    assert_eq!(metadata.job_type, JobType::FullTime);

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Data Engineer at Globex, remote, full time"));
    assert!(prompts[0].contains("ASIA_PACIFIC"));
}

#[tokio::test]
async fn test_transient_errors_are_retried() {
    let generator = MockTextGenerator::new().with_sequence([
        MockResponse::Error(MockBackendError::Status(503)),
        MockResponse::Error(MockBackendError::RateLimited),
    ]);

    let metadata = extractor(&generator)
        .with_retry_policy(fast_retries(3))
        .extract("Rust Engineer at Acme")
        .await
        .unwrap();

    assert_eq!(metadata.company_name, "Acme");
    assert_eq!(generator.call_count(), 3);
}

#[tokio::test]
async fn test_permanent_errors_fail_without_retry() {
    let generator = MockTextGenerator::new()
        .with_default(MockResponse::Error(MockBackendError::Status(401)));

    let err = extractor(&generator)
        .with_retry_policy(fast_retries(3))
        .extract("Rust Engineer at Acme")
        .await
        .unwrap_err();

    let AiExtractionError::Backend { attempts, source } = &err else {
        panic!("expected a backend error, got {err:?}");
    };
    assert_eq!(*attempts, 1);
    assert!(matches!(source, BackendError::Status { status: 401, .. }));
    assert_eq!(err.raw_response(), None);
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test]
async fn test_exhausted_retries_report_attempts() {
    let generator = MockTextGenerator::new()
        .with_default(MockResponse::Error(MockBackendError::Status(502)));

    let err = extractor(&generator)
        .with_retry_policy(fast_retries(2))
        .extract("Rust Engineer at Acme")
        .await
        .unwrap_err();

    assert!(matches!(err, AiExtractionError::Backend { attempts: 2, .. }));
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn test_hanging_backend_times_out() {
    let generator = MockTextGenerator::new().with_default(MockResponse::Hang);

    let err = extractor(&generator)
        .extract("Rust Engineer at Acme")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AiExtractionError::Timeout { timeout, attempts: 1 } if timeout == Duration::from_secs(1)
    ));
}

#[tokio::test]
async fn test_malformed_responses_keep_raw_text() {
    let cases = [
        ("Sorry, I cannot help with that.", "MissingJsonBlock"),
        ("```json\n{\"jobTitle\": \n```", "InvalidJson"),
        (
            "```json\n{\"jobTitle\": \"Chef\", \"companyName\": \"Bistro\", \"location\": \"Paris\", \
             \"jobFunction\": \"OTHER\", \"jobType\": \"FULL_TIME\", \"datePosted\": \"2024-02-30\"}\n```",
            "SchemaViolation",
        ),
    ];

    for (response, expected) in cases {
        let generator =
            MockTextGenerator::new().with_default(MockResponse::Text(response.to_string()));
        let err = extractor(&generator).extract("Chef at Bistro").await.unwrap_err();

        let kind = match &err {
            AiExtractionError::MissingJsonBlock { .. } => "MissingJsonBlock",
            AiExtractionError::InvalidJson { .. } => "InvalidJson",
            AiExtractionError::SchemaViolation { .. } => "SchemaViolation",
            other => panic!("unexpected error {other:?}"),
        };
        assert_eq!(kind, expected);
        assert_eq!(err.raw_response(), Some(response));
    }
}

#[tokio::test]
async fn test_long_pages_are_truncated_in_prompt() {
    let generator = MockTextGenerator::new();
    let page = "lorem ipsum dolor sit amet. ".repeat(5_000);

    extractor(&generator).extract(&page).await.unwrap();

    let prompt = &generator.prompts()[0];
    assert!(prompt.contains("[truncated]"));
    assert!(prompt.len() < page.len());
}
