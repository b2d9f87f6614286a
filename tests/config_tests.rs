//! Tests for loading and building `IngestConfig`

use std::io::Write;
use std::time::Duration;

use jobscrape::config::IngestConfig;
use tempfile::NamedTempFile;

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_json_file_overrides_defaults() {
    let file = write_config(
        r#"{
            "api_key": "sk-file",
            "scraper": { "headless": false, "page_load_timeout_secs": 12 },
            "extractor": { "model": "gpt-4.1-mini", "max_attempts": 5 },
            "processor": { "max_concurrent_pages": 8 },
            "validator": { "allow_private_hosts": true }
        }"#,
    );

    let config = IngestConfig::from_json_file(file.path()).unwrap();

    assert_eq!(config.api_key(), "sk-file");
    assert!(!config.scraper().headless());
    assert_eq!(config.scraper().page_load_timeout(), Duration::from_secs(12));
    assert_eq!(config.scraper().navigation_timeout(), Duration::from_secs(30));
    assert_eq!(config.extractor().model(), "gpt-4.1-mini");
    assert_eq!(config.extractor().max_attempts(), 5);
    assert_eq!(config.extractor().backend_timeout(), Duration::from_secs(60));
    assert_eq!(config.processor().max_concurrent_pages(), 8);
    assert!(config.validator().allow_private_hosts());
}

#[test]
fn test_json_file_is_validated() {
    let file = write_config(r#"{ "api_key": "k", "processor": { "max_concurrent_pages": 0 } }"#);
    let err = IngestConfig::from_json_file(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("max_concurrent_pages"));

    let file = write_config("{ not json");
    assert!(IngestConfig::from_json_file(file.path()).is_err());
}

#[test]
fn test_missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    let err = IngestConfig::from_json_file(&path).unwrap_err();
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn test_builder_round_trips_through_json() {
    let config = IngestConfig::builder()
        .api_key("sk-secret")
        .text_timeout_secs(3)
        .max_prompt_chars(5_000)
        .allow_private_hosts(true)
        .build()
        .unwrap();

    let json = serde_json::to_string(&config).unwrap();
    assert!(!json.contains("sk-secret"));

    let file = write_config(&json.replacen('{', r#"{"api_key":"sk-other","#, 1));
    let loaded = IngestConfig::from_json_file(file.path()).unwrap();
    assert_eq!(loaded.api_key(), "sk-other");
    assert_eq!(loaded.scraper().text_timeout(), Duration::from_secs(3));
    assert_eq!(loaded.extractor().max_prompt_chars(), 5_000);
    assert!(loaded.validator().allow_private_hosts());
}
