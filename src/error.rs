//! Per-link pipeline error hierarchy
//!
//! Each stage owns its own error enum. `PipelineError` is the closed union the
//! processor records on a failed link, and `failure_stage` is the only place
//! an error is mapped to the stage it terminated.

use thiserror::Error;

use crate::link_processor::FailureStage;
use crate::link_validator::ValidationError;
use crate::metadata_extractor::AiExtractionError;
use crate::web_scraper::ScrapingError;

/// Opaque cause carried by stage errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Scraping(#[from] ScrapingError),

    #[error(transparent)]
    Extraction(#[from] AiExtractionError),
}

impl PipelineError {
    #[must_use]
    pub fn failure_stage(&self) -> FailureStage {
        match self {
            Self::Validation(_) => FailureStage::ValidationFailed,
            Self::Scraping(_) => FailureStage::ScrapingFailed,
            Self::Extraction(_) => FailureStage::ExtractionFailed,
        }
    }
}
