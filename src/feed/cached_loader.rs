//! Feed loader that wraps the remote loader with transparent caching.

use tracing::{debug, info, warn};

use crate::cache::{CacheResult, Clock, FeedStore, LocalFeedLoader};
use crate::remote::{HttpClient, RemoteFeedLoader, RemoteLoadError};

use super::types::FeedItem;

/// Feed loader with transparent caching and offline support.
///
/// Every successful remote load refreshes the cache. When the remote load
/// fails, a still valid cached feed is served instead.
pub struct CachedFeedLoader<H, S, C>
where
  H: HttpClient,
  S: FeedStore,
  C: Clock,
{
  remote: RemoteFeedLoader<H>,
  local: LocalFeedLoader<S, C>,
}

impl<H, S, C> CachedFeedLoader<H, S, C>
where
  H: HttpClient + 'static,
  S: FeedStore + 'static,
  C: Clock + 'static,
{
  pub fn new(remote: RemoteFeedLoader<H>, local: LocalFeedLoader<S, C>) -> Self {
    Self { remote, local }
  }

  /// Load the feed, preferring the network.
  ///
  /// 1. Fetch from network; on success cache the result and return it
  /// 2. On network failure, return the cached feed (offline mode)
  /// 3. If nothing usable is cached, return the network error
  pub async fn load(&self) -> Result<CacheResult<Vec<FeedItem>>, RemoteLoadError> {
    let remote_error = match self.remote.load().await {
      Ok(feed) => {
        // A failed cache write must not hide fresh data
        if let Err(e) = self.local.save(&feed).await {
          warn!(error = %e, "failed to cache remote feed");
        }
        return Ok(CacheResult::from_network(feed));
      }
      Err(e) => e,
    };

    match self.local.load().await {
      Ok(feed) if !feed.is_empty() => {
        info!(count = feed.len(), error = %remote_error, "feed unavailable, serving cache");
        Ok(CacheResult::offline(feed))
      }
      Ok(_) => {
        debug!("no usable cached feed");
        Err(remote_error)
      }
      Err(e) => {
        warn!(error = %e, "failed to load cached feed");
        Err(remote_error)
      }
    }
  }
}
