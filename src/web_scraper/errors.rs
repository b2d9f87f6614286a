//! Error types for the web scraper
//!
//! `ScrapingError` is per link and recorded as `SCRAPING_FAILED`.
//! `BrowserSessionError` concerns the shared browser and aborts the batch.

use std::time::Duration;
use thiserror::Error;
use tokio::time::error::Elapsed;

use crate::error::BoxError;

/// Step of a page fetch that can time out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeStep {
    PageOpen,
    Navigation,
    TextExtraction,
    Close,
}

impl std::fmt::Display for ScrapeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageOpen => f.write_str("page open"),
            Self::Navigation => f.write_str("navigation"),
            Self::TextExtraction => f.write_str("text extraction"),
            Self::Close => f.write_str("page close"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScrapingError {
    #[error("failed to open a page for {url}: {source}")]
    PageOpen {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("{step} of {url} timed out after {timeout:?}")]
    Timeout {
        url: String,
        step: ScrapeStep,
        timeout: Duration,
        #[source]
        source: Elapsed,
    },

    #[error("failed to read page text from {url}: {source}")]
    TextExtraction {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("page at {url} has no visible text")]
    EmptyPage { url: String },

    #[error("failed to close page for {url}: {source}")]
    PageClose {
        url: String,
        #[source]
        source: BoxError,
    },
}

impl ScrapingError {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::PageOpen { url, .. }
            | Self::Navigation { url, .. }
            | Self::Timeout { url, .. }
            | Self::TextExtraction { url, .. }
            | Self::EmptyPage { url }
            | Self::PageClose { url, .. } => url,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[derive(Debug, Error)]
pub enum BrowserSessionError {
    #[error("failed to launch browser: {source}")]
    Launch {
        #[source]
        source: BoxError,
    },

    #[error("browser launch timed out after {timeout:?}")]
    LaunchTimeout { timeout: Duration },

    #[error("failed to shut down browser: {source}")]
    Shutdown {
        #[source]
        source: BoxError,
    },
}
