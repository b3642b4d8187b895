use async_trait::async_trait;
use autopager_core::PageIndex;
use autopager_domain::Page;
use autopager_engine::{FetchError, PageProducer};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::time::Duration;

/// In-memory source of numbered rows spread over pages `1..=page_count`.
pub struct SimulatedSource {
    page_count: PageIndex,
    page_size: usize,
    latency: Duration,
    /// Pages whose next fetch fails. Each entry is consumed by one failure.
    failing: Mutex<HashSet<PageIndex>>,
    requests: Mutex<Vec<PageIndex>>,
}

impl SimulatedSource {
    pub fn new(page_count: PageIndex, page_size: usize) -> Self {
        Self {
            page_count,
            page_size,
            latency: Duration::ZERO,
            failing: Mutex::new(HashSet::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_failing_pages(self, pages: impl IntoIterator<Item = PageIndex>) -> Self {
        self.failing.lock().extend(pages);
        self
    }

    /// Every index requested so far, in order.
    pub fn requests(&self) -> Vec<PageIndex> {
        self.requests.lock().clone()
    }

    fn rows(&self, index: PageIndex) -> Vec<String> {
        let offset = usize::try_from(index - 1).unwrap_or(0) * self.page_size;
        (1..=self.page_size)
            .map(|row| format!("item-{}", offset + row))
            .collect()
    }
}

#[async_trait]
impl PageProducer<String> for SimulatedSource {
    async fn produce(&self, index: PageIndex) -> Result<Page<String>, FetchError> {
        self.requests.lock().push(index);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.failing.lock().remove(&index) {
            tracing::debug!("Simulating failure for page {}", index);
            return Err(FetchError::Unavailable(format!(
                "page {index} is temporarily unavailable"
            )));
        }

        if index < 1 || index > self.page_count {
            return Err(FetchError::NotFound(index));
        }

        Ok(Page::new(index, 1, self.page_count, self.rows(index)))
    }
}
