//! Link validation, including the duplicate check against a store

use std::sync::Arc;

use jobscrape::config::IngestConfig;
use jobscrape::link_validator::{LinkValidator, ValidationError};
use jobscrape::testing::metadata_response;
use jobscrape::{
    InMemoryLinkStore, LinkStore, ProcessedLink, ProcessingOutcome, SubmittedLink,
};
use jobscrape::metadata_extractor::parse_response;

#[test]
fn test_shape_checks() {
    let validator = LinkValidator::default();

    assert_eq!(
        validator.check_shape(" <https://Jobs.Example.com/role/42?utm_campaign=x> ").unwrap(),
        "https://jobs.example.com/role/42"
    );
    assert!(matches!(validator.check_shape(""), Err(ValidationError::Empty)));
    assert!(matches!(validator.check_shape("\"()\""), Err(ValidationError::Empty)));
    assert!(matches!(
        validator.check_shape("javascript:alert(1)"),
        Err(ValidationError::UnsupportedScheme { .. })
    ));
    assert!(matches!(
        validator.check_shape("ftp://files.example.com/job.pdf"),
        Err(ValidationError::UnsupportedScheme { .. })
    ));
    assert!(matches!(
        validator.check_shape("careers"),
        Err(ValidationError::InvalidHost { .. })
    ));
    assert!(matches!(
        validator.check_shape("http://127.0.0.1:8080/jobs"),
        Err(ValidationError::BlockedHost { .. })
    ));
    assert!(matches!(
        validator.check_shape("http://192.168.1.20/jobs"),
        Err(ValidationError::BlockedHost { .. })
    ));
    assert!(validator.check_shape("example.com:8080/jobs").is_ok());
}

#[test]
fn test_private_hosts_can_be_allowed() {
    let config = IngestConfig::builder()
        .api_key("k")
        .allow_private_hosts(true)
        .build()
        .unwrap();
    let validator = LinkValidator::new(config.validator());

    assert_eq!(
        validator.check_shape("localhost:3000/jobs").unwrap(),
        "https://localhost:3000/jobs"
    );
    assert!(validator.check_shape("http://10.0.0.5/jobs").is_ok());
}

#[tokio::test]
async fn test_duplicate_canonical_url_is_rejected() {
    let first = SubmittedLink::new("https://www.example.com/jobs/1");
    let second = SubmittedLink::new("example.com/jobs/1?utm_source=x");
    let store = Arc::new(InMemoryLinkStore::with_links([first.clone(), second.clone()]));

    let metadata = parse_response(metadata_response("Engineer", "Acme")).unwrap();
    let done = ProcessedLink::new(
        &first,
        "https://example.com/jobs/1".to_string(),
        "page text".to_string(),
        metadata,
    );
    store
        .record_outcome(&ProcessingOutcome::Success(done))
        .await
        .unwrap();

    let validator = LinkValidator::default().with_store(store.clone());

    let err = validator
        .validate_link(second.id, &second.original_url)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ValidationError::Duplicate { existing_id, .. } if existing_id == first.id
    ));

    // The link that owns the URL is not its own duplicate.
    assert_eq!(
        validator
            .validate_link(first.id, &first.original_url)
            .await
            .unwrap(),
        "https://example.com/jobs/1"
    );
}
