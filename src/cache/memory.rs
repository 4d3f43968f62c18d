//! In-process feed store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::traits::{CachedFeed, FeedStore, LocalFeedItem, StoreError};

/// Feed store that keeps the cache in memory for the life of the process.
#[derive(Debug, Default)]
pub struct InMemoryFeedStore {
  cache: RwLock<Option<CachedFeed>>,
}

impl InMemoryFeedStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl FeedStore for InMemoryFeedStore {
  async fn delete_cached_feed(&self) -> Result<(), StoreError> {
    *self.cache.write().await = None;
    Ok(())
  }

  async fn insert(
    &self,
    feed: Vec<LocalFeedItem>,
    timestamp: DateTime<Utc>,
  ) -> Result<(), StoreError> {
    *self.cache.write().await = Some(CachedFeed { feed, timestamp });
    Ok(())
  }

  async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError> {
    Ok(self.cache.read().await.clone())
  }
}
