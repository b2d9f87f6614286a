//! In-memory link store for the CLI and tests.

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::LinkStore;
use crate::link_processor::{FailureStage, LinkStatus, ProcessingOutcome, SubmittedLink};
use crate::metadata_extractor::ExtractedMetadata;

/// A submitted link plus whatever the pipeline has written back for it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLink {
    pub link: SubmittedLink,
    pub status: Option<LinkStatus>,
    pub normalized_url: Option<String>,
    pub failure_stage: Option<FailureStage>,
    pub error_summary: Option<String>,
    pub scraped_text: Option<String>,
    pub extracted_metadata: Option<ExtractedMetadata>,
}

impl StoredLink {
    fn new(link: SubmittedLink) -> Self {
        Self {
            link,
            status: None,
            normalized_url: None,
            failure_stage: None,
            error_summary: None,
            scraped_text: None,
            extracted_metadata: None,
        }
    }

    fn is_pending(&self) -> bool {
        !matches!(self.status, Some(LinkStatus::PendingAdminReview))
    }
}

/// Insertion-ordered in-memory store.
///
/// Not suitable for production: everything is lost when the process exits.
#[derive(Default)]
pub struct InMemoryLinkStore {
    links: RwLock<Vec<StoredLink>>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_links(links: impl IntoIterator<Item = SubmittedLink>) -> Self {
        Self {
            links: RwLock::new(links.into_iter().map(StoredLink::new).collect()),
        }
    }

    /// Add a link. A link with the same id is replaced and its history reset.
    pub async fn insert(&self, link: SubmittedLink) {
        let mut links = self.links.write().await;
        match links.iter_mut().find(|s| s.link.id == link.id) {
            Some(existing) => *existing = StoredLink::new(link),
            None => links.push(StoredLink::new(link)),
        }
    }

    pub async fn get(&self, id: Uuid) -> Option<StoredLink> {
        self.links
            .read()
            .await
            .iter()
            .find(|s| s.link.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.links.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.links.read().await.is_empty()
    }

    /// Snapshot of every stored link in insertion order.
    pub async fn snapshot(&self) -> Vec<StoredLink> {
        self.links.read().await.clone()
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn pending_links(&self, limit: Option<usize>) -> Result<Vec<SubmittedLink>> {
        let links = self.links.read().await;
        Ok(links
            .iter()
            .filter(|s| s.is_pending())
            .take(limit.unwrap_or(usize::MAX))
            .map(|s| s.link.clone())
            .collect())
    }

    async fn find_duplicate(&self, id: Uuid, canonical_url: &str) -> Result<Option<Uuid>> {
        let links = self.links.read().await;
        Ok(links
            .iter()
            .find(|s| s.link.id != id && s.normalized_url.as_deref() == Some(canonical_url))
            .map(|s| s.link.id))
    }

    async fn record_outcome(&self, outcome: &ProcessingOutcome) -> Result<()> {
        let mut links = self.links.write().await;
        let Some(stored) = links.iter_mut().find(|s| s.link.id == outcome.id()) else {
            bail!("No stored link with id {}", outcome.id());
        };

        stored.status = Some(outcome.status());
        stored.failure_stage = outcome.failure_stage();

        match outcome {
            ProcessingOutcome::Success(done) => {
                stored.normalized_url = Some(done.normalized_url.clone());
                stored.scraped_text = Some(done.scraped_text.clone());
                stored.extracted_metadata = Some(done.extracted_metadata.clone());
                stored.error_summary = None;
            }
            ProcessingOutcome::Failure(failed) => {
                stored.link.attempts_count = stored.link.attempts_count.saturating_add(1);
                if failed.normalized_url.is_some() {
                    stored.normalized_url = failed.normalized_url.clone();
                }
                stored.error_summary = Some(failed.error_summary());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::link_processor::FailedLink;
    use crate::link_validator::ValidationError;

    #[tokio::test]
    async fn failure_increments_attempts_and_stays_pending() {
        let link = SubmittedLink::new("not a url");
        let store = InMemoryLinkStore::with_links([link.clone()]);

        let failed = FailedLink::new(&link, None, PipelineError::from(ValidationError::Empty));
        let outcome = ProcessingOutcome::Failure(failed);
        store.record_outcome(&outcome).await.unwrap();
        store.record_outcome(&outcome).await.unwrap();

        let stored = store.get(link.id).await.unwrap();
        assert_eq!(stored.link.attempts_count, 2);
        assert_eq!(stored.status, Some(LinkStatus::PendingRetry));
        assert_eq!(stored.failure_stage, Some(FailureStage::ValidationFailed));
        assert!(stored.error_summary.is_some());
        assert_eq!(store.pending_links(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_id_is_an_error() {
        let store = InMemoryLinkStore::new();
        let link = SubmittedLink::new("example.com");
        let failed = FailedLink::new(&link, None, PipelineError::from(ValidationError::Empty));
        assert!(
            store
                .record_outcome(&ProcessingOutcome::Failure(failed))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn pending_links_respects_limit_and_order() {
        let links: Vec<_> = (0..5)
            .map(|i| SubmittedLink::new(format!("example{i}.com")))
            .collect();
        let store = InMemoryLinkStore::with_links(links.clone());

        let pending = store.pending_links(Some(2)).await.unwrap();
        assert_eq!(pending, links[..2].to_vec());
    }
}
