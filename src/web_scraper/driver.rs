//! Browser driver seam
//!
//! The scraper talks to the headless browser only through these traits, so
//! the process launch, page lifecycle and text extraction can be swapped for
//! a scripted driver in tests. Timeouts are applied by the caller.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Launches browser processes.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn launch(&self) -> Result<Arc<dyn BrowserProcess>>;
}

/// A running browser process.
#[async_trait]
pub trait BrowserProcess: Send + Sync {
    /// Open a new blank page.
    async fn new_page(&self) -> Result<Arc<dyn BrowserPage>>;

    /// Terminate the process and release its resources.
    async fn shutdown(&self) -> Result<()>;
}

/// One isolated page (tab).
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Best-effort setup before the first navigation.
    async fn enhance(&self) -> Result<()>;

    async fn navigate(&self, url: &str) -> Result<()>;

    /// Current `document.readyState`.
    async fn ready_state(&self) -> Result<String>;

    /// Rendered visible text of the document body.
    async fn body_text(&self) -> Result<String>;

    async fn close(&self) -> Result<()>;
}
