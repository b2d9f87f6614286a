//! Testing utilities including mock implementations.
//!
//! These let applications and integration tests run whole batches without a
//! real browser or generative backend.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::metadata_extractor::{BackendError, TextGenerator};
use crate::web_scraper::{BrowserDriver, BrowserPage, BrowserProcess};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scripted behaviour of a page navigated to one URL.
#[derive(Debug, Clone)]
pub enum PageBehaviour {
    /// Navigation succeeds and the body contains this text.
    Text(String),
    /// Navigation fails with this message.
    NavigationError(String),
    /// Navigation never completes.
    Hang,
    /// Navigation succeeds, reading the body fails.
    TextError(String),
    /// Navigation succeeds, the body is whitespace only.
    Empty,
    /// The page reads the default text, closing it fails.
    CloseError(String),
    /// The page reads the default text, closing it never completes.
    CloseHang,
}

#[derive(Debug, Default)]
struct DriverStats {
    launches: AtomicUsize,
    shutdowns: AtomicUsize,
    pages_opened: AtomicUsize,
    pages_closed: AtomicUsize,
    navigated: Mutex<Vec<String>>,
}

/// Browser driver that counts every lifecycle call.
///
/// Unscripted URLs load `default_text`.
#[derive(Debug, Clone)]
pub struct MockBrowserDriver {
    stats: Arc<DriverStats>,
    pages: Arc<HashMap<String, PageBehaviour>>,
    default_text: String,
    launch_error: Option<String>,
    launch_delay: Option<Duration>,
    shutdown_error: Option<String>,
    hanging_page_opens: Arc<AtomicUsize>,
    hanging_enhance: bool,
}

impl Default for MockBrowserDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBrowserDriver {
    pub fn new() -> Self {
        Self {
            stats: Arc::default(),
            pages: Arc::default(),
            default_text: "Senior Rust Engineer at Acme. Full-time, remote.".to_string(),
            launch_error: None,
            launch_delay: None,
            shutdown_error: None,
            hanging_page_opens: Arc::default(),
            hanging_enhance: false,
        }
    }

    /// Script the page for `url` (a canonical URL).
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, behaviour: PageBehaviour) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.into(), behaviour);
        self
    }

    #[must_use]
    pub fn with_default_text(mut self, text: impl Into<String>) -> Self {
        self.default_text = text.into();
        self
    }

    /// Make every launch fail with `message`.
    #[must_use]
    pub fn failing_launch(mut self, message: impl Into<String>) -> Self {
        self.launch_error = Some(message.into());
        self
    }

    /// Delay every launch.
    #[must_use]
    pub fn with_launch_delay(mut self, delay: Duration) -> Self {
        self.launch_delay = Some(delay);
        self
    }

    /// Make process shutdown fail with `message` (after counting it).
    #[must_use]
    pub fn failing_shutdown(mut self, message: impl Into<String>) -> Self {
        self.shutdown_error = Some(message.into());
        self
    }

    /// Make the next `count` page opens never complete.
    ///
    /// The URL is not known when a page is opened, so this is counted per
    /// driver rather than scripted per URL.
    #[must_use]
    pub fn with_hanging_page_opens(self, count: usize) -> Self {
        self.hanging_page_opens.store(count, Ordering::SeqCst);
        self
    }

    /// Make page enhancement never complete on every page.
    #[must_use]
    pub fn with_hanging_enhance(mut self) -> Self {
        self.hanging_enhance = true;
        self
    }

    pub fn launches(&self) -> usize {
        self.stats.launches.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.stats.shutdowns.load(Ordering::SeqCst)
    }

    pub fn pages_opened(&self) -> usize {
        self.stats.pages_opened.load(Ordering::SeqCst)
    }

    pub fn pages_closed(&self) -> usize {
        self.stats.pages_closed.load(Ordering::SeqCst)
    }

    /// URLs navigated to, in call order.
    pub fn navigated(&self) -> Vec<String> {
        lock(&self.stats.navigated).clone()
    }
}

#[async_trait]
impl BrowserDriver for MockBrowserDriver {
    async fn launch(&self) -> Result<Arc<dyn BrowserProcess>> {
        self.stats.launches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.launch_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.launch_error {
            return Err(anyhow!("{message}"));
        }
        Ok(Arc::new(MockProcess {
            driver: self.clone(),
        }))
    }
}

struct MockProcess {
    driver: MockBrowserDriver,
}

#[async_trait]
impl BrowserProcess for MockProcess {
    async fn new_page(&self) -> Result<Arc<dyn BrowserPage>> {
        let hangs = self
            .driver
            .hanging_page_opens
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if hangs {
            return std::future::pending().await;
        }

        self.driver.stats.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockPage {
            driver: self.driver.clone(),
            url: Mutex::new(None),
        }))
    }

    async fn shutdown(&self) -> Result<()> {
        self.driver.stats.shutdowns.fetch_add(1, Ordering::SeqCst);
        match &self.driver.shutdown_error {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(()),
        }
    }
}

struct MockPage {
    driver: MockBrowserDriver,
    url: Mutex<Option<String>>,
}

impl MockPage {
    fn behaviour(&self) -> Option<PageBehaviour> {
        let url = lock(&self.url).clone()?;
        self.driver.pages.get(&url).cloned()
    }
}

#[async_trait]
impl BrowserPage for MockPage {
    async fn enhance(&self) -> Result<()> {
        if self.driver.hanging_enhance {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        *lock(&self.url) = Some(url.to_string());
        lock(&self.driver.stats.navigated).push(url.to_string());

        match self.behaviour() {
            Some(PageBehaviour::NavigationError(message)) => Err(anyhow!("{message}")),
            Some(PageBehaviour::Hang) => std::future::pending().await,
            _ => Ok(()),
        }
    }

    async fn ready_state(&self) -> Result<String> {
        Ok("complete".to_string())
    }

    async fn body_text(&self) -> Result<String> {
        match self.behaviour() {
            Some(PageBehaviour::Text(text)) => Ok(text),
            Some(PageBehaviour::TextError(message)) => Err(anyhow!("{message}")),
            Some(PageBehaviour::Empty) => Ok("  \n\t ".to_string()),
            _ => Ok(self.driver.default_text.clone()),
        }
    }

    async fn close(&self) -> Result<()> {
        self.driver.stats.pages_closed.fetch_add(1, Ordering::SeqCst);
        match self.behaviour() {
            Some(PageBehaviour::CloseError(message)) => Err(anyhow!("{message}")),
            Some(PageBehaviour::CloseHang) => std::future::pending().await,
            _ => Ok(()),
        }
    }
}

/// Scripted response of the mock backend.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Error(MockBackendError),
    /// Never answers.
    Hang,
}

/// Cloneable description of a `BackendError` to return.
#[derive(Debug, Clone)]
pub enum MockBackendError {
    RateLimited,
    Status(u16),
    Empty,
}

impl MockBackendError {
    fn to_error(&self) -> BackendError {
        match self {
            Self::RateLimited => BackendError::RateLimited {
                retry_after: Some(Duration::from_millis(1)),
            },
            Self::Status(status) => BackendError::Status {
                status: *status,
                body: "mock failure".to_string(),
            },
            Self::Empty => BackendError::EmptyResponse,
        }
    }
}

/// Text generator with scripted responses and call tracking.
///
/// A rule matches when the prompt contains its needle; rules are checked in
/// insertion order. Queued responses are consumed first, one per call.
#[derive(Debug, Clone)]
pub struct MockTextGenerator {
    rules: Vec<(String, MockResponse)>,
    queue: Arc<Mutex<VecDeque<MockResponse>>>,
    default: MockResponse,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTextGenerator {
    /// Answers every prompt with valid metadata for an engineering role.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            queue: Arc::default(),
            default: MockResponse::Text(metadata_response("Senior Rust Engineer", "Acme")),
            prompts: Arc::default(),
        }
    }

    /// Use `response` for prompts containing `needle`.
    #[must_use]
    pub fn with_rule(mut self, needle: impl Into<String>, response: MockResponse) -> Self {
        self.rules.push((needle.into(), response));
        self
    }

    #[must_use]
    pub fn with_default(mut self, response: MockResponse) -> Self {
        self.default = response;
        self
    }

    /// Answer the next calls with `responses`, in order, before any rule.
    #[must_use]
    pub fn with_sequence(self, responses: impl IntoIterator<Item = MockResponse>) -> Self {
        lock(&self.queue).extend(responses);
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    fn next_response(&self, prompt: &str) -> MockResponse {
        if let Some(queued) = lock(&self.queue).pop_front() {
            return queued;
        }
        self.rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map_or_else(|| self.default.clone(), |(_, response)| response.clone())
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        lock(&self.prompts).push(prompt.to_string());
        match self.next_response(prompt) {
            MockResponse::Text(text) => Ok(text),
            MockResponse::Error(error) => Err(error.to_error()),
            MockResponse::Hang => std::future::pending().await,
        }
    }
}

/// A backend reply carrying valid metadata in a fenced json block.
pub fn metadata_response(job_title: &str, company_name: &str) -> String {
    let body = serde_json::json!({
        "jobTitle": job_title,
        "companyName": company_name,
        "location": "REMOTE",
        "jobFunction": "ENGINEERING",
        "jobType": "FULL_TIME",
        "datePosted": "2024-05-01",
    });
    format!("Here is the metadata:\n```json\n{body:#}\n```\n")
}
