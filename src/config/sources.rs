//! Loading `IngestConfig` from the environment or a JSON file

use anyhow::{Context, Result, bail};
use std::path::Path;

use super::builder::validate;
use super::types::IngestConfig;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MODEL_VAR: &str = "JOBSCRAPE_MODEL";
pub const API_BASE_VAR: &str = "JOBSCRAPE_API_BASE";
pub const MAX_CONCURRENT_PAGES_VAR: &str = "JOBSCRAPE_MAX_CONCURRENT_PAGES";
pub const HEADLESS_VAR: &str = "JOBSCRAPE_HEADLESS";

impl IngestConfig {
    /// Build a config from environment variables.
    ///
    /// `OPENAI_API_KEY` is required. `JOBSCRAPE_MODEL`, `JOBSCRAPE_API_BASE`,
    /// `JOBSCRAPE_MAX_CONCURRENT_PAGES` and `JOBSCRAPE_HEADLESS` override the
    /// defaults. The browser binary override (`CHROMIUM_PATH`) is read by
    /// browser discovery, not here.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load a JSON config file.
    ///
    /// Unset fields take their defaults. A missing `api_key` falls back to
    /// `OPENAI_API_KEY`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&raw, |name| std::env::var(name).ok())
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = IngestConfig {
            api_key: var(API_KEY_VAR).with_context(|| format!("{API_KEY_VAR} is not set"))?,
            ..IngestConfig::default()
        };

        if let Some(model) = var(MODEL_VAR) {
            config.extractor.model = model;
        }
        if let Some(base) = var(API_BASE_VAR) {
            config.extractor.api_base = base;
        }
        if let Some(pages) = var(MAX_CONCURRENT_PAGES_VAR) {
            let pages = pages
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{MAX_CONCURRENT_PAGES_VAR} must be a number, got '{pages}'"))?;
            config.processor.max_concurrent_pages = Some(pages);
        }
        if let Some(headless) = var(HEADLESS_VAR) {
            config.scraper.headless = parse_bool(HEADLESS_VAR, &headless)?;
        }

        validate(&mut config)?;
        Ok(config)
    }

    pub(crate) fn from_json_str(raw: &str, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config: IngestConfig = serde_json::from_str(raw)?;
        if config.api_key.trim().is_empty()
            && let Some(key) = var(API_KEY_VAR)
        {
            config.api_key = key;
        }
        validate(&mut config)?;
        Ok(config)
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{name} must be a boolean, got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_requires_api_key() {
        let err = IngestConfig::from_vars(vars(&[])).unwrap_err();
        assert!(err.to_string().contains(API_KEY_VAR));
    }

    #[test]
    fn env_overrides_defaults() {
        let config = IngestConfig::from_vars(vars(&[
            (API_KEY_VAR, "sk-env"),
            (MODEL_VAR, "llama3"),
            (API_BASE_VAR, "http://localhost:11434/v1"),
            (MAX_CONCURRENT_PAGES_VAR, "8"),
            (HEADLESS_VAR, "no"),
        ]))
        .unwrap();

        assert_eq!(config.api_key(), "sk-env");
        assert_eq!(config.extractor().model(), "llama3");
        assert_eq!(config.extractor().api_base(), "http://localhost:11434/v1");
        assert_eq!(config.processor().max_concurrent_pages(), 8);
        assert!(!config.scraper().headless());
    }

    #[test]
    fn env_rejects_garbage_numbers() {
        assert!(
            IngestConfig::from_vars(vars(&[
                (API_KEY_VAR, "k"),
                (MAX_CONCURRENT_PAGES_VAR, "lots")
            ]))
            .is_err()
        );
        assert!(
            IngestConfig::from_vars(vars(&[(API_KEY_VAR, "k"), (HEADLESS_VAR, "maybe")])).is_err()
        );
    }

    #[test]
    fn json_falls_back_to_env_key() {
        let raw = r#"{"processor": {"max_concurrent_pages": 2}}"#;
        let config = IngestConfig::from_json_str(raw, vars(&[(API_KEY_VAR, "sk-fallback")])).unwrap();
        assert_eq!(config.api_key(), "sk-fallback");
        assert_eq!(config.processor().max_concurrent_pages(), 2);

        assert!(IngestConfig::from_json_str(raw, vars(&[])).is_err());
    }

    #[test]
    fn api_key_is_never_serialized() {
        let config = IngestConfig::from_json_str(r#"{"api_key": "secret"}"#, vars(&[])).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
