pub mod browser_setup;
pub mod config;
pub mod error;
pub mod link_processor;
pub mod link_validator;
pub mod metadata_extractor;
pub mod persistence;
pub mod testing;
pub mod url_normalizer;
pub mod utils;
pub mod web_scraper;

use std::sync::Arc;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{IngestConfig, IngestConfigBuilder};
pub use error::PipelineError;
pub use link_processor::{
    BatchProgress, BatchReport, FailedLink, FailureStage, LinkProcessor, LinkState, LinkStatus,
    NoOpProgress, ProcessedLink, ProcessingOutcome, SubmittedLink,
};
pub use link_validator::{LinkValidator, ValidationError, validate_link};
pub use metadata_extractor::{
    AiExtractionError, ExtractedMetadata, JobFunction, JobType, MetadataExtractor,
    OpenAiGenerator, Region, TextGenerator,
};
pub use persistence::{InMemoryLinkStore, LinkStore, persist_report};
pub use url_normalizer::normalize;
pub use web_scraper::{BrowserHandle, BrowserSessionError, ScrapingError, WebScraper};

/// Process one batch with a Chromium browser and the OpenAI-compatible
/// backend described by `config`.
pub async fn process_links(
    config: &IngestConfig,
    links: &[SubmittedLink],
) -> Result<BatchReport, BrowserSessionError> {
    let processor = LinkProcessor::from_config(
        config,
        Arc::new(web_scraper::ChromiumDriver::new(config.scraper().clone())),
        Arc::new(OpenAiGenerator::from_config(config)),
    );
    processor.process_links(links).await
}
