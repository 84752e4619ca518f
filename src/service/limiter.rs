use crate::SitemapError;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Caps the number of crawls running at the same time
///
/// Every crawl holds a permit for its whole duration; callers beyond the cap
/// wait until one is released.
#[derive(Debug, Clone)]
pub struct CrawlLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl CrawlLimiter {
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits for a free crawl slot
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, SitemapError> {
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| SitemapError::LimiterClosed)
    }

    /// Slots not currently taken
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
