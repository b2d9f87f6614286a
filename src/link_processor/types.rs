//! Batch input/output types for the link processor

use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::metadata_extractor::ExtractedMetadata;

/// A user-submitted link as read from the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedLink {
    pub id: Uuid,
    pub original_url: String,
    #[serde(default)]
    pub attempts_count: u32,
}

impl SubmittedLink {
    /// New link with a random id and no previous attempts.
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_url: original_url.into(),
            attempts_count: 0,
        }
    }
}

/// Stage at which a failed link's processing stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureStage {
    ValidationFailed,
    ScrapingFailed,
    ExtractionFailed,
}

impl FailureStage {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::ScrapingFailed => "SCRAPING_FAILED",
            Self::ExtractionFailed => "EXTRACTION_FAILED",
        }
    }
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review status stamped on every terminal link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkStatus {
    PendingAdminReview,
    PendingRetry,
}

/// Per-link processing state.
///
/// ```text
/// Pending -> Validating -> ValidationFailed
///                       -> Scraping -> ScrapingFailed
///                                   -> Extracting -> ExtractionFailed
///                                                 -> Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkState {
    Pending,
    Validating,
    Scraping,
    Extracting,
    Done,
    ValidationFailed,
    ScrapingFailed,
    ExtractionFailed,
}

impl LinkState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Done | Self::ValidationFailed | Self::ScrapingFailed | Self::ExtractionFailed
        )
    }

    #[must_use]
    pub fn from_failure_stage(stage: FailureStage) -> Self {
        match stage {
            FailureStage::ValidationFailed => Self::ValidationFailed,
            FailureStage::ScrapingFailed => Self::ScrapingFailed,
            FailureStage::ExtractionFailed => Self::ExtractionFailed,
        }
    }

    /// Whether `next` is a legal successor of this state.
    #[must_use]
    pub fn can_transition_to(&self, next: LinkState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Validating)
                | (Self::Validating, Self::ValidationFailed | Self::Scraping)
                | (Self::Scraping, Self::ScrapingFailed | Self::Extracting)
                | (Self::Extracting, Self::ExtractionFailed | Self::Done)
        )
    }
}

/// A link that made it through all three stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedLink {
    pub id: Uuid,
    pub original_url: String,
    pub normalized_url: String,
    pub scraped_text: String,
    pub extracted_metadata: ExtractedMetadata,
    pub status: LinkStatus,
    /// Always `None`; serialized as `null` so both result sets share a shape.
    pub failure_stage: Option<FailureStage>,
}

impl ProcessedLink {
    pub fn new(
        link: &SubmittedLink,
        normalized_url: String,
        scraped_text: String,
        extracted_metadata: ExtractedMetadata,
    ) -> Self {
        Self {
            id: link.id,
            original_url: link.original_url.clone(),
            normalized_url,
            scraped_text,
            extracted_metadata,
            status: LinkStatus::PendingAdminReview,
            failure_stage: None,
        }
    }
}

/// A link whose processing stopped at one stage.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedLink {
    pub id: Uuid,
    pub original_url: String,
    /// Present once validation succeeded.
    pub normalized_url: Option<String>,
    pub status: LinkStatus,
    pub failure_stage: FailureStage,
    #[serde(serialize_with = "serialize_error")]
    pub error: PipelineError,
}

impl FailedLink {
    pub fn new(link: &SubmittedLink, normalized_url: Option<String>, error: PipelineError) -> Self {
        Self {
            id: link.id,
            original_url: link.original_url.clone(),
            normalized_url,
            status: LinkStatus::PendingRetry,
            failure_stage: error.failure_stage(),
            error,
        }
    }

    /// One-line error summary for persistence and reports.
    #[must_use]
    pub fn error_summary(&self) -> String {
        self.error.to_string()
    }
}

fn serialize_error<S: Serializer>(error: &PipelineError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Terminal result for one link.
#[derive(Debug)]
pub enum ProcessingOutcome {
    Success(ProcessedLink),
    Failure(FailedLink),
}

impl ProcessingOutcome {
    #[must_use]
    pub fn id(&self) -> Uuid {
        match self {
            Self::Success(link) => link.id,
            Self::Failure(link) => link.id,
        }
    }

    #[must_use]
    pub fn status(&self) -> LinkStatus {
        match self {
            Self::Success(link) => link.status,
            Self::Failure(link) => link.status,
        }
    }

    #[must_use]
    pub fn failure_stage(&self) -> Option<FailureStage> {
        match self {
            Self::Success(_) => None,
            Self::Failure(link) => Some(link.failure_stage),
        }
    }

    #[must_use]
    pub fn state(&self) -> LinkState {
        self.failure_stage()
            .map_or(LinkState::Done, LinkState::from_failure_stage)
    }
}

/// Aggregated result of one batch.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub successful_links: Vec<ProcessedLink>,
    pub failed_links: Vec<FailedLink>,
    /// Whether the shared browser was launched for this batch.
    pub browser_opened: bool,
    /// Set when every link that reached scraping failed there.
    pub systemic_scraping_failure: bool,
}

impl BatchReport {
    pub fn push(&mut self, outcome: ProcessingOutcome) {
        match outcome {
            ProcessingOutcome::Success(link) => self.successful_links.push(link),
            ProcessingOutcome::Failure(link) => self.failed_links.push(link),
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.successful_links.len() + self.failed_links.len()
    }

    /// Number of failed links at `stage`.
    #[must_use]
    pub fn count_failed(&self, stage: FailureStage) -> usize {
        self.failed_links
            .iter()
            .filter(|f| f.failure_stage == stage)
            .count()
    }

    pub fn outcomes(self) -> impl Iterator<Item = ProcessingOutcome> {
        self.successful_links
            .into_iter()
            .map(ProcessingOutcome::Success)
            .chain(self.failed_links.into_iter().map(ProcessingOutcome::Failure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!LinkState::Pending.is_terminal());
        assert!(!LinkState::Scraping.is_terminal());
        assert!(LinkState::Done.is_terminal());
        assert!(LinkState::from_failure_stage(FailureStage::ScrapingFailed).is_terminal());
    }

    #[test]
    fn transitions_follow_stage_order() {
        assert!(LinkState::Pending.can_transition_to(LinkState::Validating));
        assert!(LinkState::Validating.can_transition_to(LinkState::Scraping));
        assert!(!LinkState::Validating.can_transition_to(LinkState::Extracting));
        assert!(!LinkState::Done.can_transition_to(LinkState::Pending));
        assert!(!LinkState::ScrapingFailed.can_transition_to(LinkState::Extracting));
    }

    #[test]
    fn stage_serializes_screaming_snake() {
        let json = serde_json::to_string(&FailureStage::ExtractionFailed).unwrap();
        assert_eq!(json, "\"EXTRACTION_FAILED\"");
        assert_eq!(FailureStage::ScrapingFailed.to_string(), "SCRAPING_FAILED");

        let json = serde_json::to_string(&LinkStatus::PendingAdminReview).unwrap();
        assert_eq!(json, "\"PENDING_ADMIN_REVIEW\"");
    }

    #[test]
    fn submitted_link_defaults_attempts() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"id":"{id}","originalUrl":"example.com"}}"#);
        let link: SubmittedLink = serde_json::from_str(&json).unwrap();
        assert_eq!(link.id, id);
        assert_eq!(link.attempts_count, 0);
    }
}
