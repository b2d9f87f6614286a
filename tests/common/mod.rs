//! Test utilities and helper functions for the jobscrape test suite

use std::sync::{Arc, Mutex};

use jobscrape::config::IngestConfig;
use jobscrape::testing::{MockBrowserDriver, MockTextGenerator};
use jobscrape::{
    BatchProgress, LinkProcessor, LinkState, ProcessingOutcome, SubmittedLink,
};
use uuid::Uuid;

/// Route library logs to the test output. Safe to call from every test.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("jobscrape=debug"))
        .with_test_writer()
        .try_init();
}

/// Config with one-second timeouts and a single backend attempt.
#[allow(dead_code)]
pub fn fast_config() -> IngestConfig {
    IngestConfig::builder()
        .api_key("sk-test")
        .page_load_timeout_secs(1)
        .navigation_timeout_secs(1)
        .text_timeout_secs(1)
        .page_op_timeout_secs(1)
        .launch_timeout_secs(5)
        .backend_timeout_secs(1)
        .max_attempts(1)
        .backoff_ms(1, 5)
        .max_concurrent_pages(2)
        .build()
        .expect("test config is valid")
}

#[allow(dead_code)]
pub fn processor(driver: &MockBrowserDriver, generator: &MockTextGenerator) -> LinkProcessor {
    processor_with(&fast_config(), driver, generator)
}

#[allow(dead_code)]
pub fn processor_with(
    config: &IngestConfig,
    driver: &MockBrowserDriver,
    generator: &MockTextGenerator,
) -> LinkProcessor {
    LinkProcessor::from_config(
        config,
        Arc::new(driver.clone()),
        Arc::new(generator.clone()),
    )
}

#[allow(dead_code)]
pub fn links(urls: &[&str]) -> Vec<SubmittedLink> {
    urls.iter().map(|url| SubmittedLink::new(*url)).collect()
}

/// Progress reporter that records every event.
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingProgress {
    pub states: Mutex<Vec<(Uuid, LinkState)>>,
    pub browser_opened: Mutex<usize>,
    pub browser_closed: Mutex<usize>,
    pub outcomes: Mutex<Vec<Uuid>>,
    pub systemic: Mutex<Vec<usize>>,
}

#[allow(dead_code)]
impl RecordingProgress {
    /// States reported for one link, in order.
    pub fn states_of(&self, id: Uuid) -> Vec<LinkState> {
        self.states
            .lock()
            .unwrap()
            .iter()
            .filter(|(link, _)| *link == id)
            .map(|(_, state)| *state)
            .collect()
    }
}

impl BatchProgress for RecordingProgress {
    fn on_state(&self, link_id: Uuid, state: LinkState) {
        self.states.lock().unwrap().push((link_id, state));
    }

    fn on_browser_opened(&self) {
        *self.browser_opened.lock().unwrap() += 1;
    }

    fn on_browser_closed(&self) {
        *self.browser_closed.lock().unwrap() += 1;
    }

    fn on_outcome(&self, outcome: &ProcessingOutcome) {
        self.outcomes.lock().unwrap().push(outcome.id());
    }

    fn on_systemic_scraping_failure(&self, scraped: usize) {
        self.systemic.lock().unwrap().push(scraped);
    }
}
