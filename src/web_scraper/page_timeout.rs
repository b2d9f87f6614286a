//! Timeout utilities for page operations
//!
//! Wraps page futures in `tokio::time::timeout` so a hung navigation or
//! script evaluation becomes a typed `ScrapingError::Timeout`.

use std::future::Future;
use std::time::Duration;

use super::errors::{ScrapeStep, ScrapingError};

/// Run a page operation with an explicit timeout
///
/// # Returns
/// * `Ok(T)` - Operation completed successfully
/// * `Err` - Either the operation's own error or `ScrapingError::Timeout`
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    url: &str,
    step: ScrapeStep,
) -> Result<T, ScrapingError>
where
    F: Future<Output = Result<T, ScrapingError>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(elapsed) => Err(ScrapingError::Timeout {
            url: url.to_string(),
            step,
            timeout,
            source: elapsed,
        }),
    }
}
