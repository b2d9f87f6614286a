//! Shared configuration constants for jobscrape
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Default number of pages open at once on the shared browser.
///
/// Every validated link holds one page while it is scraped and extracted, so
/// this also bounds concurrent backend calls for a batch.
pub const DEFAULT_MAX_CONCURRENT_PAGES: usize = 4;

/// Upper bound accepted by the config builder for `max_concurrent_pages`.
pub const MAX_CONCURRENT_PAGES_LIMIT: usize = 100;

/// Timeout for `page.goto()` in seconds.
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 30;

/// Timeout for waiting on the navigation / ready state to settle.
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 30;

/// Timeout for evaluating the body-text script on a loaded page.
pub const DEFAULT_TEXT_TIMEOUT_SECS: u64 = 10;

/// Timeout for opening, preparing and closing a page on the shared browser.
pub const DEFAULT_PAGE_OP_TIMEOUT_SECS: u64 = 10;

/// Timeout for launching the browser process (includes managed download).
pub const DEFAULT_LAUNCH_TIMEOUT_SECS: u64 = 60;

/// Timeout for a single generative backend call.
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 60;

/// Number of backend attempts for transient failures (1 = no retry).
pub const DEFAULT_BACKEND_MAX_ATTEMPTS: u32 = 3;

/// Page text longer than this is truncated before it goes into the prompt.
///
/// Job descriptions rarely exceed a few thousand words; the tail of a long
/// page is usually footer and related-jobs noise.
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 24_000;

/// Smallest `max_prompt_chars` the builder accepts.
pub const MIN_PROMPT_CHARS: usize = 1_000;

/// Default chat model for the OpenAI-compatible backend.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default base URL for the OpenAI-compatible backend.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Query parameters that only carry tracking / analytics state.
///
/// Matched case-insensitively against the parameter key.
pub const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "msclkid",
    "dclid",
    "_ga",
    "_gl",
    "ref",
];

/// Chrome user agent string for stealth mode
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// Chrome releases new stable versions ~every 4 weeks.
/// Update quarterly to stay within reasonable version window.
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
