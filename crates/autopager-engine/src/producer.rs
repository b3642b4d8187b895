use async_trait::async_trait;
use autopager_core::PageIndex;
use autopager_domain::Page;
use thiserror::Error;

/// Why a producer could not deliver a page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("page {0} does not exist")]
    NotFound(PageIndex),

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// The collaborator that actually fetches a page (network, disk, memory).
///
/// Called off the UI task; the coordinator posts the result back onto the
/// UI queue before applying it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageProducer<E: Send + Sync + 'static>: Send + Sync {
    async fn produce(&self, index: PageIndex) -> Result<Page<E>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_mock_produces_on_spawned_task() {
        let mut producer = MockPageProducer::new();
        producer
            .expect_produce()
            .with(eq(2))
            .times(1)
            .returning(|index| Ok(Page::new(index, 1, 3, vec!["b"])));
        producer
            .expect_produce()
            .with(eq(9))
            .times(1)
            .returning(|index| Err(FetchError::NotFound(index)));

        let producer: Arc<dyn PageProducer<&'static str>> = Arc::new(producer);
        let handle = tokio::spawn({
            let producer = Arc::clone(&producer);
            async move { producer.produce(2).await }
        });

        let page = handle.await.unwrap().unwrap();
        assert_eq!(page.elements, vec!["b"]);
        assert_eq!(producer.produce(9).await, Err(FetchError::NotFound(9)));
    }
}
