//! Builder methods available for all states
//!
//! This module contains methods that can be called on the builder
//! regardless of its current type state.

use std::path::PathBuf;

use super::builder::IngestConfigBuilder;

impl<State> IngestConfigBuilder<State> {
    /// Set browser headless mode
    ///
    /// Headed mode shows a visible browser window and needs a display server.
    /// It is only honoured in debug builds; release builds force headless.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.scraper.headless = headless;
        self
    }

    /// Use this browser binary instead of running discovery
    #[must_use]
    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.scraper.chrome_executable = Some(path.into());
        self
    }

    #[must_use]
    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.config.scraper.page_load_timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn navigation_timeout_secs(mut self, secs: u64) -> Self {
        self.config.scraper.navigation_timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn text_timeout_secs(mut self, secs: u64) -> Self {
        self.config.scraper.text_timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn page_op_timeout_secs(mut self, secs: u64) -> Self {
        self.config.scraper.page_op_timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn launch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.scraper.launch_timeout_secs = Some(secs);
        self
    }

    /// Toggle viewport/navigator overrides applied before navigation
    #[must_use]
    pub fn enhance_pages(mut self, enhance: bool) -> Self {
        self.config.scraper.enhance_pages = enhance;
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.extractor.model = model.into();
        self
    }

    /// Base URL of an OpenAI-compatible API, e.g. `http://localhost:11434/v1`
    #[must_use]
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.config.extractor.api_base = base.into();
        self
    }

    #[must_use]
    pub fn backend_timeout_secs(mut self, secs: u64) -> Self {
        self.config.extractor.backend_timeout_secs = Some(secs);
        self
    }

    /// Set total backend attempts for transient failures
    ///
    /// Rate limits, 5xx responses and transport errors are retried with
    /// exponential backoff. Set to 1 to disable retries.
    ///
    /// # Example
    /// ```rust
    /// # use jobscrape::config::IngestConfig;
    /// # fn main() -> anyhow::Result<()> {
    /// let config = IngestConfig::builder()
    ///     .api_key("sk-test")
    ///     .max_attempts(5)
    ///     .build()?;
    /// assert_eq!(config.extractor().max_attempts(), 5);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.extractor.max_attempts = Some(attempts);
        self
    }

    #[must_use]
    pub fn backoff_ms(mut self, initial: u64, max: u64) -> Self {
        self.config.extractor.initial_backoff_ms = Some(initial);
        self.config.extractor.max_backoff_ms = Some(max);
        self
    }

    #[must_use]
    pub fn max_prompt_chars(mut self, chars: usize) -> Self {
        self.config.extractor.max_prompt_chars = Some(chars);
        self
    }

    /// Set the maximum number of pages open at once (1-100)
    ///
    /// Every validated link holds a page while it is scraped and extracted,
    /// so this also bounds concurrent backend calls.
    #[must_use]
    pub fn max_concurrent_pages(mut self, pages: usize) -> Self {
        self.config.processor.max_concurrent_pages = Some(pages);
        self
    }

    #[must_use]
    pub fn allow_private_hosts(mut self, allow: bool) -> Self {
        self.config.validator.allow_private_hosts = allow;
        self
    }
}
