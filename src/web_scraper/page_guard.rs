//! Scoped page ownership
//!
//! A `PageGuard` owns one open page for the duration of a fetch. The normal
//! path awaits `close()`. If the fetch future is dropped or unwinds first,
//! `Drop` schedules the close on the current runtime so the tab is not leaked.

use std::sync::Arc;

use super::driver::BrowserPage;

pub(crate) struct PageGuard {
    page: Arc<dyn BrowserPage>,
    url: String,
    closed: bool,
}

impl PageGuard {
    pub(crate) fn new(page: Arc<dyn BrowserPage>, url: impl Into<String>) -> Self {
        Self {
            page,
            url: url.into(),
            closed: false,
        }
    }

    pub(crate) fn page(&self) -> &dyn BrowserPage {
        self.page.as_ref()
    }

    /// Close the page and disarm the drop fallback.
    pub(crate) async fn close(mut self) -> anyhow::Result<()> {
        self.closed = true;
        self.page.close().await
    }
}

impl Drop for PageGuard {
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        let page = Arc::clone(&self.page);
        let url = std::mem::take(&mut self.url);
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                log::debug!(
                    target: "jobscrape::cleanup",
                    "Page for {url} dropped before close, closing in background"
                );
                runtime.spawn(async move {
                    if let Err(e) = page.close().await {
                        log::warn!(
                            target: "jobscrape::cleanup",
                            "Background close of page for {url} failed: {e}"
                        );
                    }
                });
            }
            Err(_) => {
                log::warn!(
                    target: "jobscrape::cleanup",
                    "Page for {url} dropped outside a runtime, it closes with the browser"
                );
            }
        }
    }
}
