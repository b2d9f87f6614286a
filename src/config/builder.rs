//! Type-safe builder for `IngestConfig` using the typestate pattern
//!
//! The API key is the only required field, so `build()` only exists once
//! `api_key()` has been called.

use anyhow::{Result, anyhow, bail};
use std::marker::PhantomData;

use super::types::IngestConfig;
use crate::utils::{MAX_CONCURRENT_PAGES_LIMIT, MIN_PROMPT_CHARS};

// Type states for the builder
pub struct WithApiKey;

pub struct IngestConfigBuilder<State = ()> {
    pub(crate) config: IngestConfig,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for IngestConfigBuilder<()> {
    fn default() -> Self {
        Self {
            config: IngestConfig::default(),
            _phantom: PhantomData,
        }
    }
}

impl IngestConfig {
    /// Create a builder for configuring an `IngestConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> IngestConfigBuilder<()> {
        IngestConfigBuilder::default()
    }
}

impl IngestConfigBuilder<()> {
    pub fn api_key(self, key: impl Into<String>) -> IngestConfigBuilder<WithApiKey> {
        let mut config = self.config;
        config.api_key = key.into();
        IngestConfigBuilder {
            config,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when all required fields are set
impl IngestConfigBuilder<WithApiKey> {
    pub fn build(self) -> Result<IngestConfig> {
        let mut config = self.config;

        // Enforce headless mode in release builds for production safety
        #[cfg(not(debug_assertions))]
        if !config.scraper.headless {
            tracing::warn!(
                "Forcing headless mode in release build. \
                Headed mode is only available in debug builds for development."
            );
            config.scraper.headless = true;
        }

        validate(&mut config)?;
        Ok(config)
    }
}

/// Range checks shared by the builder and the file/env loaders.
pub(crate) fn validate(config: &mut IngestConfig) -> Result<()> {
    config.api_key = config.api_key.trim().to_string();
    if config.api_key.is_empty() {
        bail!("api_key is required");
    }

    let pages = config.processor.max_concurrent_pages();
    if !(1..=MAX_CONCURRENT_PAGES_LIMIT).contains(&pages) {
        bail!("max_concurrent_pages must be between 1 and {MAX_CONCURRENT_PAGES_LIMIT}, got {pages}");
    }

    let scraper = &config.scraper;
    for (name, secs) in [
        ("page_load_timeout_secs", scraper.page_load_timeout_secs),
        ("navigation_timeout_secs", scraper.navigation_timeout_secs),
        ("text_timeout_secs", scraper.text_timeout_secs),
        ("page_op_timeout_secs", scraper.page_op_timeout_secs),
        ("launch_timeout_secs", scraper.launch_timeout_secs),
        ("backend_timeout_secs", config.extractor.backend_timeout_secs),
    ] {
        if secs == Some(0) {
            bail!("{name} must be greater than zero");
        }
    }

    let extractor = &config.extractor;
    if extractor.max_attempts() == 0 {
        bail!("max_attempts must be at least 1");
    }
    if extractor.max_prompt_chars() < MIN_PROMPT_CHARS {
        bail!(
            "max_prompt_chars must be at least {MIN_PROMPT_CHARS}, got {}",
            extractor.max_prompt_chars()
        );
    }
    if extractor.model.trim().is_empty() {
        bail!("model must not be empty");
    }
    url::Url::parse(&extractor.api_base)
        .map_err(|e| anyhow!("Invalid api_base '{}': {e}", extractor.api_base))?;

    Ok(())
}
