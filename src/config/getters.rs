//! Getter methods for the configuration types
//!
//! Optional fields resolve to their defaults here so callers never see `None`.

use std::path::Path;
use std::time::Duration;

use super::types::{ExtractorConfig, IngestConfig, ProcessorConfig, ScraperConfig, ValidatorConfig};
use crate::utils::{
    DEFAULT_BACKEND_MAX_ATTEMPTS, DEFAULT_BACKEND_TIMEOUT_SECS, DEFAULT_LAUNCH_TIMEOUT_SECS,
    DEFAULT_MAX_CONCURRENT_PAGES, DEFAULT_MAX_PROMPT_CHARS, DEFAULT_NAVIGATION_TIMEOUT_SECS,
    DEFAULT_PAGE_LOAD_TIMEOUT_SECS, DEFAULT_PAGE_OP_TIMEOUT_SECS, DEFAULT_TEXT_TIMEOUT_SECS,
};

impl IngestConfig {
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub fn scraper(&self) -> &ScraperConfig {
        &self.scraper
    }

    #[must_use]
    pub fn extractor(&self) -> &ExtractorConfig {
        &self.extractor
    }

    #[must_use]
    pub fn processor(&self) -> &ProcessorConfig {
        &self.processor
    }

    #[must_use]
    pub fn validator(&self) -> &ValidatorConfig {
        &self.validator
    }
}

impl ScraperConfig {
    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chrome_executable(&self) -> Option<&Path> {
        self.chrome_executable.as_deref()
    }

    /// Get the page load timeout
    ///
    /// Returns the configured timeout for `page.goto()` operations.
    /// If None, defaults to 30 seconds.
    #[must_use]
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(
            self.page_load_timeout_secs
                .unwrap_or(DEFAULT_PAGE_LOAD_TIMEOUT_SECS),
        )
    }

    /// Get the navigation settle timeout
    ///
    /// If None, defaults to 30 seconds.
    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(
            self.navigation_timeout_secs
                .unwrap_or(DEFAULT_NAVIGATION_TIMEOUT_SECS),
        )
    }

    #[must_use]
    pub fn text_timeout(&self) -> Duration {
        Duration::from_secs(self.text_timeout_secs.unwrap_or(DEFAULT_TEXT_TIMEOUT_SECS))
    }

    /// Bound on page open, enhancement and close. Defaults to 10 seconds.
    #[must_use]
    pub fn page_op_timeout(&self) -> Duration {
        Duration::from_secs(
            self.page_op_timeout_secs
                .unwrap_or(DEFAULT_PAGE_OP_TIMEOUT_SECS),
        )
    }

    #[must_use]
    pub fn launch_timeout(&self) -> Duration {
        Duration::from_secs(
            self.launch_timeout_secs
                .unwrap_or(DEFAULT_LAUNCH_TIMEOUT_SECS),
        )
    }

    #[must_use]
    pub fn enhance_pages(&self) -> bool {
        self.enhance_pages
    }
}

impl ExtractorConfig {
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    #[must_use]
    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(
            self.backend_timeout_secs
                .unwrap_or(DEFAULT_BACKEND_TIMEOUT_SECS),
        )
    }

    /// Get the number of backend attempts
    ///
    /// Includes the first call, so 1 disables retries. Defaults to 3.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.unwrap_or(DEFAULT_BACKEND_MAX_ATTEMPTS)
    }

    #[must_use]
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms.unwrap_or(500))
    }

    #[must_use]
    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms.unwrap_or(8_000))
    }

    #[must_use]
    pub fn max_prompt_chars(&self) -> usize {
        self.max_prompt_chars.unwrap_or(DEFAULT_MAX_PROMPT_CHARS)
    }
}

impl ProcessorConfig {
    /// Get the maximum number of pages open at once
    ///
    /// Default is 4, range is 1-100.
    #[must_use]
    pub fn max_concurrent_pages(&self) -> usize {
        self.max_concurrent_pages
            .unwrap_or(DEFAULT_MAX_CONCURRENT_PAGES)
    }
}

impl ValidatorConfig {
    #[must_use]
    pub fn allow_private_hosts(&self) -> bool {
        self.allow_private_hosts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_fall_back_to_defaults() {
        let config = IngestConfig::default();
        assert!(config.scraper().headless());
        assert_eq!(config.scraper().page_load_timeout(), Duration::from_secs(30));
        assert_eq!(config.scraper().text_timeout(), Duration::from_secs(10));
        assert_eq!(config.extractor().max_attempts(), 3);
        assert_eq!(config.extractor().initial_backoff(), Duration::from_millis(500));
        assert_eq!(config.extractor().max_prompt_chars(), 24_000);
        assert_eq!(config.processor().max_concurrent_pages(), 4);
        assert!(!config.validator().allow_private_hosts());
    }
}
