//! Persistence collaborator interface
//!
//! The pipeline only reads submitted links and writes back terminal outcomes.
//! Scheduling retries of `PENDING_RETRY` links is the store owner's job.

mod memory;

pub use memory::{InMemoryLinkStore, StoredLink};

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::link_processor::{BatchReport, ProcessingOutcome, SubmittedLink};

#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Links that have not reached admin review yet, oldest first.
    async fn pending_links(&self, limit: Option<usize>) -> Result<Vec<SubmittedLink>>;

    /// Id of another link that already resolved to `canonical_url`, if any.
    async fn find_duplicate(&self, id: Uuid, canonical_url: &str) -> Result<Option<Uuid>>;

    /// Write back one terminal outcome keyed by link id.
    ///
    /// Failures increment the link's `attempts_count`.
    async fn record_outcome(&self, outcome: &ProcessingOutcome) -> Result<()>;
}

/// Write every outcome of a batch to `store`.
///
/// Returns the number of outcomes written. Stops at the first store error.
pub async fn persist_report(store: &dyn LinkStore, report: BatchReport) -> Result<usize> {
    let mut written = 0;
    for outcome in report.outcomes() {
        store.record_outcome(&outcome).await?;
        written += 1;
    }
    tracing::debug!(written, "Persisted batch outcomes");
    Ok(written)
}
