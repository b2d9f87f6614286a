//! Shared browser handle for one batch

use anyhow::{Result, bail};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::driver::{BrowserPage, BrowserProcess};

/// Cloneable handle to the one browser process of a batch.
///
/// Pages can be opened from any clone. `shutdown` runs the process teardown
/// at most once no matter how many clones call it.
#[derive(Clone)]
pub struct BrowserHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    process: Arc<dyn BrowserProcess>,
    closed: AtomicBool,
}

impl std::fmt::Debug for BrowserHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserHandle")
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl BrowserHandle {
    pub(crate) fn new(process: Arc<dyn BrowserProcess>) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                process,
                closed: AtomicBool::new(false),
            }),
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    pub(crate) async fn new_page(&self) -> Result<Arc<dyn BrowserPage>> {
        if self.is_closed() {
            bail!("browser session is already closed");
        }
        self.inner.process.new_page().await
    }

    /// Tear the process down. Returns `Ok(false)` if it was already closed.
    pub(crate) async fn shutdown(&self) -> Result<bool> {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return Ok(false);
        }
        self.inner.process.shutdown().await.map(|()| true)
    }
}
