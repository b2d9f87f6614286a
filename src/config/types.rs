//! Core configuration types for link ingestion
//!
//! `IngestConfig` groups one section per pipeline component. Optional fields
//! fall back to the defaults in `crate::utils::constants` through the getters.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{DEFAULT_API_BASE, DEFAULT_MODEL};

/// Main configuration struct for a batch run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// API key for the generative backend. Never serialized.
    #[serde(skip_serializing)]
    pub(crate) api_key: String,
    pub(crate) scraper: ScraperConfig,
    pub(crate) extractor: ExtractorConfig,
    pub(crate) processor: ProcessorConfig,
    pub(crate) validator: ValidatorConfig,
}

/// Shared browser and per-page settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub(crate) headless: bool,

    /// Explicit browser binary. When unset, discovery runs (`CHROMIUM_PATH`,
    /// platform paths, then a managed download).
    pub(crate) chrome_executable: Option<PathBuf>,

    /// Timeout in seconds for `page.goto()`
    ///
    /// Default: 30 seconds
    pub(crate) page_load_timeout_secs: Option<u64>,

    /// Timeout in seconds for the document ready-state to settle after
    /// navigation
    ///
    /// Default: 30 seconds
    pub(crate) navigation_timeout_secs: Option<u64>,

    /// Timeout in seconds for reading the body text of a loaded page
    ///
    /// Default: 10 seconds
    pub(crate) text_timeout_secs: Option<u64>,

    /// Timeout in seconds for opening a page, applying enhancements and
    /// closing the page again
    ///
    /// Default: 10 seconds
    pub(crate) page_op_timeout_secs: Option<u64>,

    /// Timeout in seconds for launching the browser process
    ///
    /// Includes a managed browser download on first use.
    ///
    /// Default: 60 seconds
    pub(crate) launch_timeout_secs: Option<u64>,

    /// Apply viewport and navigator overrides before navigating
    pub(crate) enhance_pages: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_executable: None,
            page_load_timeout_secs: None,
            navigation_timeout_secs: None,
            text_timeout_secs: None,
            page_op_timeout_secs: None,
            launch_timeout_secs: None,
            enhance_pages: true,
        }
    }
}

/// Generative backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub(crate) model: String,
    pub(crate) api_base: String,
    pub(crate) backend_timeout_secs: Option<u64>,
    /// Total attempts per backend call, including the first
    pub(crate) max_attempts: Option<u32>,
    pub(crate) initial_backoff_ms: Option<u64>,
    pub(crate) max_backoff_ms: Option<u64>,
    /// Page text beyond this many characters is dropped from the prompt
    pub(crate) max_prompt_chars: Option<usize>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            backend_timeout_secs: None,
            max_attempts: None,
            initial_backoff_ms: None,
            max_backoff_ms: None,
            max_prompt_chars: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Maximum pages open at once on the shared browser (1-100)
    pub(crate) max_concurrent_pages: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Accept `localhost` and loopback/private/link-local addresses
    pub(crate) allow_private_hosts: bool,
}
