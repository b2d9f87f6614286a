//! Progress reporting for batch runs
//!
//! `BatchProgress` is called at every per-link state change and at the
//! browser lifecycle points of a batch. `NoOpProgress` is what
//! `LinkProcessor::process_links` uses.

use uuid::Uuid;

use super::types::{LinkState, ProcessingOutcome};

/// Receives lifecycle events from a running batch.
///
/// Callbacks run inline on the batch future, so implementations should
/// hand work off (channels, atomics) rather than block. After a cancelled
/// batch, `on_browser_closed` runs on the background shutdown task once the
/// browser is actually down.
pub trait BatchProgress: Send + Sync {
    /// A link moved to `state`.
    fn on_state(&self, link_id: Uuid, state: LinkState);

    /// The shared browser was launched.
    fn on_browser_opened(&self);

    /// The shared browser was closed.
    fn on_browser_closed(&self);

    /// A link reached a terminal outcome.
    fn on_outcome(&self, outcome: &ProcessingOutcome);

    /// Every one of `scraped` links that reached scraping failed there.
    fn on_systemic_scraping_failure(&self, scraped: usize);
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl BatchProgress for NoOpProgress {
    #[inline(always)]
    fn on_state(&self, _link_id: Uuid, _state: LinkState) {}

    #[inline(always)]
    fn on_browser_opened(&self) {}

    #[inline(always)]
    fn on_browser_closed(&self) {}

    #[inline(always)]
    fn on_outcome(&self, _outcome: &ProcessingOutcome) {}

    #[inline(always)]
    fn on_systemic_scraping_failure(&self, _scraped: usize) {}
}
