//! chromiumoxide-backed browser driver

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use super::driver::{BrowserDriver, BrowserPage, BrowserProcess};
use super::page_enhancer::enhance_page;
use crate::browser_setup::launch_browser;
use crate::config::ScraperConfig;

/// Wrapper for Browser and its event handler task
///
/// The handler MUST be aborted once the browser is gone, otherwise it keeps
/// running after the process has exited.
pub struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserWrapper {
    pub(crate) fn new(browser: Browser, handler: JoinHandle<()>, user_data_dir: PathBuf) -> Self {
        Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
        }
    }

    pub(crate) fn browser(&self) -> &Browser {
        &self.browser
    }

    pub(crate) fn browser_mut(&mut self) -> &mut Browser {
        &mut self.browser
    }

    /// Remove the per-launch profile directory.
    ///
    /// MUST run after `browser.wait()` so Chrome has released its file
    /// handles. Blocking, because it also runs from `Drop`.
    pub fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            info!("Cleaning up temp directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                tracing::warn!(
                    "Failed to clean up temp directory {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        self.handler.abort();

        if self.user_data_dir.is_some() {
            tracing::warn!(
                "BrowserWrapper dropped without explicit shutdown - removing temp dir in Drop"
            );
            self.cleanup_temp_dir();
        }
    }
}

/// Launches one Chromium process per call, each with a fresh profile.
pub struct ChromiumDriver {
    config: ScraperConfig,
}

impl ChromiumDriver {
    #[must_use]
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn launch(&self) -> Result<Arc<dyn BrowserProcess>> {
        let user_data_dir =
            std::env::temp_dir().join(format!("jobscrape_chrome_{}", Uuid::new_v4()));

        let (browser, handler) = launch_browser(
            self.config.headless(),
            self.config.chrome_executable(),
            &user_data_dir,
        )
        .await?;

        Ok(Arc::new(ChromiumBrowser {
            wrapper: RwLock::new(Some(BrowserWrapper::new(browser, handler, user_data_dir))),
            enhance_pages: self.config.enhance_pages(),
        }))
    }
}

struct ChromiumBrowser {
    wrapper: RwLock<Option<BrowserWrapper>>,
    enhance_pages: bool,
}

#[async_trait]
impl BrowserProcess for ChromiumBrowser {
    async fn new_page(&self) -> Result<Arc<dyn BrowserPage>> {
        let guard = self.wrapper.read().await;
        let wrapper = guard
            .as_ref()
            .ok_or_else(|| anyhow!("browser has been shut down"))?;

        let page = wrapper
            .browser()
            .new_page("about:blank")
            .await
            .context("Failed to create blank page")?;

        Ok(Arc::new(ChromiumPage {
            page,
            enhance: self.enhance_pages,
        }))
    }

    async fn shutdown(&self) -> Result<()> {
        let Some(mut wrapper) = self.wrapper.write().await.take() else {
            return Ok(());
        };

        info!("Shutting down batch browser");
        let closed = wrapper.browser_mut().close().await;

        if let Err(e) = wrapper.browser_mut().wait().await {
            tracing::warn!("Failed to wait for browser exit: {}", e);
        }
        wrapper.cleanup_temp_dir();
        drop(wrapper);

        closed.context("Failed to close browser")?;
        Ok(())
    }
}

struct ChromiumPage {
    page: Page,
    enhance: bool,
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn enhance(&self) -> Result<()> {
        if self.enhance {
            enhance_page(&self.page).await?;
        }
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    async fn ready_state(&self) -> Result<String> {
        Ok(self
            .page
            .evaluate("document.readyState")
            .await?
            .into_value::<String>()?)
    }

    async fn body_text(&self) -> Result<String> {
        Ok(self
            .page
            .evaluate("document.body ? document.body.innerText : ''")
            .await?
            .into_value::<String>()?)
    }

    async fn close(&self) -> Result<()> {
        self.page.clone().close().await?;
        Ok(())
    }
}
