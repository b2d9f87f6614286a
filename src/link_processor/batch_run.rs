//! Batch-scoped ownership of the shared browser
//!
//! A `BatchRun` lives for exactly one call to the processor's entry point.
//! The browser is launched on the first `browser()` call and closed by
//! `finish()`. If the batch future is dropped or unwinds before `finish()`
//! runs, `Drop` schedules the shutdown on the current runtime instead.

use std::sync::Arc;
use tokio::sync::OnceCell;

use super::progress::BatchProgress;
use crate::web_scraper::{BrowserHandle, BrowserSessionError, WebScraper};

pub(crate) struct BatchRun<'a> {
    scraper: &'a WebScraper,
    progress: Arc<dyn BatchProgress>,
    browser: OnceCell<BrowserHandle>,
}

impl<'a> BatchRun<'a> {
    pub(crate) fn new(scraper: &'a WebScraper, progress: Arc<dyn BatchProgress>) -> Self {
        Self {
            scraper,
            progress,
            browser: OnceCell::new(),
        }
    }

    /// Shared browser for this batch, launched on first use.
    pub(crate) async fn browser(&self) -> Result<&BrowserHandle, BrowserSessionError> {
        self.browser
            .get_or_try_init(|| async {
                let handle = self.scraper.open_session().await?;
                self.progress.on_browser_opened();
                Ok(handle)
            })
            .await
    }

    /// Close the browser if it was opened. Returns whether it was.
    pub(crate) async fn finish(self) -> Result<bool, BrowserSessionError> {
        let Some(handle) = self.browser.get() else {
            return Ok(false);
        };

        let result = self.scraper.close_session(handle).await;
        self.progress.on_browser_closed();
        result.map(|()| true)
    }
}

impl Drop for BatchRun<'_> {
    fn drop(&mut self) {
        let Some(handle) = self.browser.get() else {
            return;
        };
        if handle.is_closed() {
            return;
        }

        let handle = handle.clone();
        let progress = Arc::clone(&self.progress);
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                log::warn!(
                    target: "jobscrape::cleanup",
                    "Batch ended before the browser was closed, scheduling shutdown"
                );
                runtime.spawn(async move {
                    match handle.shutdown().await {
                        Ok(_) => log::debug!(target: "jobscrape::cleanup", "Browser closed after interrupted batch"),
                        Err(e) => log::error!(
                            target: "jobscrape::cleanup",
                            "Failed to close browser after interrupted batch: {e}"
                        ),
                    }
                    progress.on_browser_closed();
                });
            }
            Err(_) => log::error!(
                target: "jobscrape::cleanup",
                "No tokio runtime available to close the browser of an interrupted batch"
            ),
        }
    }
}
