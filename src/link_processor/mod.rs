//! Batch orchestration of submitted links
//!
//! `LinkProcessor::process_links` drives every link of a batch through
//! validation, scraping and extraction:
//!
//! ```text
//! Pending -> Validating -> Scraping -> Extracting -> Done
//!                  \            \            \
//!           ValidationFailed  ScrapingFailed  ExtractionFailed
//! ```
//!
//! All links validate concurrently. The shared browser is launched once, and
//! only when at least one link passed validation. Validated links then scrape
//! and extract concurrently, at most `max_concurrent_pages` at a time. A
//! failing link never affects its siblings; only browser launch and teardown
//! failures abort the batch.

mod batch_run;
mod progress;
mod types;

pub use progress::{BatchProgress, NoOpProgress};
pub use types::{
    BatchReport, FailedLink, FailureStage, LinkState, LinkStatus, ProcessedLink,
    ProcessingOutcome, SubmittedLink,
};

use futures::StreamExt;
use futures::future::join_all;
use futures::stream;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::config::IngestConfig;
use crate::error::PipelineError;
use crate::link_validator::LinkValidator;
use crate::metadata_extractor::{MetadataExtractor, TextGenerator};
use crate::web_scraper::{BrowserDriver, BrowserHandle, BrowserSessionError, WebScraper};
use batch_run::BatchRun;

pub struct LinkProcessor {
    validator: LinkValidator,
    scraper: Arc<WebScraper>,
    extractor: MetadataExtractor,
    max_concurrent_pages: usize,
}

impl std::fmt::Debug for LinkProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkProcessor")
            .field("validator", &self.validator)
            .field("extractor", &self.extractor)
            .field("max_concurrent_pages", &self.max_concurrent_pages)
            .finish_non_exhaustive()
    }
}

impl LinkProcessor {
    pub fn new(
        validator: LinkValidator,
        scraper: Arc<WebScraper>,
        extractor: MetadataExtractor,
        max_concurrent_pages: usize,
    ) -> Self {
        Self {
            validator,
            scraper,
            extractor,
            max_concurrent_pages: max_concurrent_pages.max(1),
        }
    }

    /// Wire every component from one config.
    pub fn from_config(
        config: &IngestConfig,
        driver: Arc<dyn BrowserDriver>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self::new(
            LinkValidator::new(config.validator()),
            Arc::new(WebScraper::new(driver, config.scraper().clone())),
            MetadataExtractor::new(generator, config.extractor()),
            config.processor().max_concurrent_pages(),
        )
    }

    /// Replace the validator, e.g. with one that checks a `LinkStore` for
    /// duplicates.
    #[must_use]
    pub fn with_validator(mut self, validator: LinkValidator) -> Self {
        self.validator = validator;
        self
    }

    #[must_use]
    pub fn max_concurrent_pages(&self) -> usize {
        self.max_concurrent_pages
    }

    /// Process one batch of links.
    ///
    /// Every link ends up in exactly one of `successful_links` and
    /// `failed_links`. Only browser launch or teardown failures are returned
    /// as errors.
    pub async fn process_links(
        &self,
        links: &[SubmittedLink],
    ) -> Result<BatchReport, BrowserSessionError> {
        self.process_links_with_progress(links, Arc::new(NoOpProgress)).await
    }

    /// Like `process_links`, reporting lifecycle events to `reporter`.
    pub async fn process_links_with_progress(
        &self,
        links: &[SubmittedLink],
        reporter: Arc<dyn BatchProgress>,
    ) -> Result<BatchReport, BrowserSessionError> {
        let started = Instant::now();
        let progress = reporter.as_ref();
        log::info!(
            target: "jobscrape::processor",
            "Processing batch of {} link(s)",
            links.len()
        );

        let mut report = BatchReport::default();

        let validated = join_all(links.iter().map(|link| async move {
            progress.on_state(link.id, LinkState::Pending);
            progress.on_state(link.id, LinkState::Validating);
            let result = self
                .validator
                .validate_link(link.id, &link.original_url)
                .await;
            (link, result)
        }))
        .await;

        let mut accepted = Vec::with_capacity(validated.len());
        for (link, result) in validated {
            match result {
                Ok(canonical) => accepted.push((link, canonical)),
                Err(e) => {
                    debug!(link_id = %link.id, url = %link.original_url, error = %e, "Validation failed");
                    let failure = FailedLink::new(link, None, e.into());
                    record(&mut report, progress, ProcessingOutcome::Failure(failure));
                }
            }
        }

        if accepted.is_empty() {
            log::info!(
                target: "jobscrape::processor",
                "No link passed validation, browser not needed ({} failed)",
                report.failed_links.len()
            );
            return Ok(report);
        }

        let run = BatchRun::new(&self.scraper, Arc::clone(&reporter));
        let handle = run.browser().await?;
        report.browser_opened = true;

        let reached_scraping = accepted.len();
        let mut outcomes = stream::iter(
            accepted
                .into_iter()
                .map(|(link, canonical)| self.process_validated(handle, link, canonical, progress)),
        )
        .buffer_unordered(self.max_concurrent_pages);

        while let Some(outcome) = outcomes.next().await {
            record(&mut report, progress, outcome);
        }
        drop(outcomes);

        run.finish().await?;

        let scraping_failures = report.count_failed(FailureStage::ScrapingFailed);
        if scraping_failures == reached_scraping {
            report.systemic_scraping_failure = true;
            log::warn!(
                target: "jobscrape::processor",
                "All {reached_scraping} link(s) that reached scraping failed to scrape, \
                 the browser or network is likely broken"
            );
            progress.on_systemic_scraping_failure(reached_scraping);
        }

        log::info!(
            target: "jobscrape::processor",
            "Batch finished in {:.2}s: {} succeeded, {} failed",
            started.elapsed().as_secs_f64(),
            report.successful_links.len(),
            report.failed_links.len()
        );
        Ok(report)
    }

    /// Scrape and extract one validated link.
    async fn process_validated(
        &self,
        handle: &BrowserHandle,
        link: &SubmittedLink,
        canonical: String,
        progress: &dyn BatchProgress,
    ) -> ProcessingOutcome {
        progress.on_state(link.id, LinkState::Scraping);
        let text = match self.scraper.fetch_body_text(handle, &canonical).await {
            Ok(text) => text,
            Err(e) => {
                debug!(link_id = %link.id, url = %canonical, error = %e, "Scraping failed");
                return failed(link, canonical, e.into());
            }
        };

        progress.on_state(link.id, LinkState::Extracting);
        match self.extractor.extract(&text).await {
            Ok(metadata) => {
                debug!(link_id = %link.id, url = %canonical, title = %metadata.job_title, "Link processed");
                ProcessingOutcome::Success(ProcessedLink::new(link, canonical, text, metadata))
            }
            Err(e) => {
                debug!(link_id = %link.id, url = %canonical, error = %e, "Extraction failed");
                failed(link, canonical, e.into())
            }
        }
    }
}

fn failed(link: &SubmittedLink, canonical: String, error: PipelineError) -> ProcessingOutcome {
    ProcessingOutcome::Failure(FailedLink::new(link, Some(canonical), error))
}

fn record(report: &mut BatchReport, progress: &dyn BatchProgress, outcome: ProcessingOutcome) {
    progress.on_state(outcome.id(), outcome.state());
    progress.on_outcome(&outcome);
    report.push(outcome);
}
