//! Browser-driven page fetching
//!
//! `WebScraper` opens the shared browser for a batch, fetches the rendered
//! body text of one canonical URL per call and tears the browser down again.
//! Each fetch uses its own page, and that page is closed before the fetch
//! returns on every path.

pub mod chromium;
pub mod driver;
pub mod errors;
pub mod page_enhancer;
pub(crate) mod page_guard;
pub mod page_timeout;
pub mod session;

pub use chromium::{BrowserWrapper, ChromiumDriver};
pub use driver::{BrowserDriver, BrowserPage, BrowserProcess};
pub use errors::{BrowserSessionError, ScrapeStep, ScrapingError};
pub use session::BrowserHandle;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::utils::compact_page_text;
use page_guard::PageGuard;
use page_timeout::with_page_timeout;

const READY_STATE_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct WebScraper {
    driver: Arc<dyn BrowserDriver>,
    config: ScraperConfig,
}

impl WebScraper {
    pub fn new(driver: Arc<dyn BrowserDriver>, config: ScraperConfig) -> Self {
        Self { driver, config }
    }

    /// Scraper backed by a real Chromium process.
    #[must_use]
    pub fn chromium(config: ScraperConfig) -> Self {
        Self::new(Arc::new(ChromiumDriver::new(config.clone())), config)
    }

    #[must_use]
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Launch the browser process for a batch.
    ///
    /// Callers share the returned handle. `BatchRun` makes sure this runs at
    /// most once per batch.
    pub async fn open_session(&self) -> Result<BrowserHandle, BrowserSessionError> {
        let timeout = self.config.launch_timeout();
        let started = Instant::now();

        let process = tokio::time::timeout(timeout, self.driver.launch())
            .await
            .map_err(|_| BrowserSessionError::LaunchTimeout { timeout })?
            .map_err(|e| BrowserSessionError::Launch { source: e.into() })?;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Browser session opened"
        );
        Ok(BrowserHandle::new(process))
    }

    /// Fetch the visible body text of `url` on a fresh page.
    ///
    /// Every page step is bounded by a timeout. Whitespace-only text is
    /// `ScrapingError::EmptyPage`. A close error is only reported when the
    /// fetch itself succeeded.
    pub async fn fetch_body_text(
        &self,
        handle: &BrowserHandle,
        url: &str,
    ) -> Result<String, ScrapingError> {
        let op_timeout = self.config.page_op_timeout();

        let page = with_page_timeout(
            async {
                handle
                    .new_page()
                    .await
                    .map_err(|e| ScrapingError::PageOpen {
                        url: url.to_string(),
                        source: e.into(),
                    })
            },
            op_timeout,
            url,
            ScrapeStep::PageOpen,
        )
        .await?;
        let guard = PageGuard::new(page, url);

        let result = self.read_page(guard.page(), url).await;

        let closed = with_page_timeout(
            async {
                guard.close().await.map_err(|e| ScrapingError::PageClose {
                    url: url.to_string(),
                    source: e.into(),
                })
            },
            op_timeout,
            url,
            ScrapeStep::Close,
        )
        .await;

        match (result, closed) {
            (Ok(text), Ok(())) => Ok(text),
            (Ok(_), Err(e)) => Err(e),
            (Err(err), closed) => {
                if let Err(close_err) = closed {
                    warn!(url, error = %close_err, "Failed to close page after scraping error");
                }
                Err(err)
            }
        }
    }

    /// Close the browser. Safe to call repeatedly and without any page opened.
    pub async fn close_session(&self, handle: &BrowserHandle) -> Result<(), BrowserSessionError> {
        match handle.shutdown().await {
            Ok(true) => {
                info!("Browser session closed");
                Ok(())
            }
            Ok(false) => {
                debug!("Browser session already closed");
                Ok(())
            }
            Err(e) => Err(BrowserSessionError::Shutdown { source: e.into() }),
        }
    }

    async fn read_page(&self, page: &dyn BrowserPage, url: &str) -> Result<String, ScrapingError> {
        let op_timeout = self.config.page_op_timeout();
        match tokio::time::timeout(op_timeout, page.enhance()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(url, error = %e, "Page enhancement failed, continuing without it");
            }
            Err(_) => warn!(
                url,
                timeout_ms = op_timeout.as_millis() as u64,
                "Page enhancement timed out, continuing without it"
            ),
        }

        with_page_timeout(
            async {
                page.navigate(url)
                    .await
                    .map_err(|e| ScrapingError::Navigation {
                        url: url.to_string(),
                        source: e.into(),
                    })
            },
            self.config.page_load_timeout(),
            url,
            ScrapeStep::Navigation,
        )
        .await?;

        self.wait_for_ready_state(page, url).await;

        let raw = with_page_timeout(
            async {
                page.body_text()
                    .await
                    .map_err(|e| ScrapingError::TextExtraction {
                        url: url.to_string(),
                        source: e.into(),
                    })
            },
            self.config.text_timeout(),
            url,
            ScrapeStep::TextExtraction,
        )
        .await?;

        let text = compact_page_text(&raw);
        if text.is_empty() {
            return Err(ScrapingError::EmptyPage {
                url: url.to_string(),
            });
        }

        debug!(url, chars = text.chars().count(), "Extracted page text");
        Ok(text)
    }

    /// Poll `document.readyState` until `complete`, giving up silently at the
    /// navigation timeout.
    async fn wait_for_ready_state(&self, page: &dyn BrowserPage, url: &str) {
        let max_wait = self.config.navigation_timeout();
        let start = Instant::now();

        loop {
            let remaining = max_wait.saturating_sub(start.elapsed());
            if remaining.is_zero() {
                log::warn!(
                    "Timeout waiting for {url} to finish loading after {}s, proceeding anyway",
                    max_wait.as_secs()
                );
                return;
            }

            match tokio::time::timeout(remaining, page.ready_state()).await {
                Ok(Ok(state)) if state == "complete" => {
                    log::debug!(
                        "{url} ready after {:.2}s",
                        start.elapsed().as_secs_f64()
                    );
                    return;
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => log::debug!("readyState check failed for {url}: {e}"),
                Err(_) => continue,
            }

            tokio::time::sleep(READY_STATE_POLL_INTERVAL.min(remaining)).await;
        }
    }
}
