//! Local feed loader: sequences the feed store and the cache policy.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::clock::Clock;
use super::policy;
use super::traits::{CachedFeed, FeedStore, LocalFeedItem, StoreError};
use crate::feed::FeedItem;

/// Failure of a cache operation, carrying the store's error untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CacheError {
  #[error("failed to delete cached feed: {0}")]
  DeletionFailed(#[source] StoreError),

  #[error("failed to insert feed into cache: {0}")]
  InsertionFailed(#[source] StoreError),

  #[error("failed to retrieve cached feed: {0}")]
  RetrievalFailed(#[source] StoreError),
}

pub type SaveResult = Result<(), CacheError>;
pub type LoadResult = Result<Vec<FeedItem>, CacheError>;

/// Saves the feed to, and loads it from, a [`FeedStore`].
///
/// Holds no locks of its own. Concurrent `save` calls may interleave their
/// delete/insert pairs; callers that need one write at a time serialize
/// them.
pub struct LocalFeedLoader<S: FeedStore, C: Clock> {
  store: Arc<S>,
  current_date: C,
}

impl<S, C> LocalFeedLoader<S, C>
where
  S: FeedStore + 'static,
  C: Clock + 'static,
{
  pub fn new(store: Arc<S>, current_date: C) -> Self {
    Self {
      store,
      current_date,
    }
  }

  /// Replace the cached feed with `feed`, timestamped with the current date.
  ///
  /// The old cache is deleted first. If that fails nothing is inserted and
  /// the deletion error is returned.
  pub async fn save(&self, feed: &[FeedItem]) -> SaveResult {
    self
      .store
      .delete_cached_feed()
      .await
      .map_err(CacheError::DeletionFailed)?;

    self.cache(feed).await
  }

  async fn cache(&self, feed: &[FeedItem]) -> SaveResult {
    let timestamp = self.current_date.now();
    debug!(count = feed.len(), %timestamp, "caching feed");
    self
      .store
      .insert(to_local(feed), timestamp)
      .await
      .map_err(CacheError::InsertionFailed)
  }

  /// Load the cached feed.
  ///
  /// An empty or expired cache yields an empty feed, not an error. Loading
  /// never modifies the store.
  pub async fn load(&self) -> LoadResult {
    let cached = self
      .store
      .retrieve()
      .await
      .map_err(CacheError::RetrievalFailed)?;

    Ok(self.usable_items(cached))
  }

  fn usable_items(&self, cached: Option<CachedFeed>) -> Vec<FeedItem> {
    match cached {
      Some(cached) if policy::is_valid(cached.timestamp, self.current_date.now()) => {
        debug!(count = cached.feed.len(), "serving cached feed");
        to_models(cached.feed)
      }
      Some(cached) => {
        debug!(timestamp = %cached.timestamp, "cached feed expired");
        Vec::new()
      }
      None => Vec::new(),
    }
  }

  /// Purge a cache that can't be read or has expired.
  ///
  /// An empty or still valid cache is left alone.
  pub async fn validate_cache(&self) -> SaveResult {
    let retrieval = self.store.retrieve().await;

    if self.must_delete(retrieval) {
      debug!("deleting invalid cached feed");
      self
        .store
        .delete_cached_feed()
        .await
        .map_err(CacheError::DeletionFailed)?;
    }

    Ok(())
  }

  fn must_delete(&self, retrieval: Result<Option<CachedFeed>, StoreError>) -> bool {
    match retrieval {
      Ok(Some(cached)) => !policy::is_valid(cached.timestamp, self.current_date.now()),
      Ok(None) => false,
      Err(e) => {
        warn!(error = %e, "cached feed unreadable, deleting it");
        true
      }
    }
  }

  /// Run [`save`](Self::save) on a background task and report to `completion`.
  ///
  /// The task keeps only a weak reference to the loader. Once the loader is
  /// dropped, the step in flight finishes against the store but nothing
  /// further happens: no insertion follows and `completion` never runs.
  pub fn spawn_save<F>(self: &Arc<Self>, feed: Vec<FeedItem>, completion: F) -> JoinHandle<()>
  where
    F: FnOnce(SaveResult) + Send + 'static,
  {
    let loader = Arc::downgrade(self);
    let store = Arc::clone(&self.store);

    tokio::spawn(async move {
      let deletion = store.delete_cached_feed().await;

      let timestamp = {
        let Some(loader) = loader.upgrade() else {
          debug!("local loader dropped during cache deletion");
          return;
        };
        if let Err(e) = deletion {
          completion(Err(CacheError::DeletionFailed(e)));
          return;
        }
        loader.current_date.now()
      };

      let insertion = store.insert(to_local(&feed), timestamp).await;

      let Some(_loader) = loader.upgrade() else {
        debug!("local loader dropped during cache insertion");
        return;
      };
      completion(insertion.map_err(CacheError::InsertionFailed));
    })
  }

  /// Run [`load`](Self::load) on a background task and report to `completion`.
  ///
  /// Nothing is delivered if the loader is dropped before retrieval finishes.
  pub fn spawn_load<F>(self: &Arc<Self>, completion: F) -> JoinHandle<()>
  where
    F: FnOnce(LoadResult) + Send + 'static,
  {
    let loader = Arc::downgrade(self);
    let store = Arc::clone(&self.store);

    tokio::spawn(async move {
      let retrieval = store.retrieve().await;

      let Some(loader) = loader.upgrade() else {
        debug!("local loader dropped during cache retrieval");
        return;
      };
      completion(
        retrieval
          .map(|cached| loader.usable_items(cached))
          .map_err(CacheError::RetrievalFailed),
      );
    })
  }

  /// Run [`validate_cache`](Self::validate_cache) on a background task and
  /// report to `completion`.
  ///
  /// No deletion is requested and nothing is delivered once the loader is
  /// dropped.
  pub fn spawn_validate_cache<F>(self: &Arc<Self>, completion: F) -> JoinHandle<()>
  where
    F: FnOnce(SaveResult) + Send + 'static,
  {
    let loader = Arc::downgrade(self);
    let store = Arc::clone(&self.store);

    tokio::spawn(async move {
      let retrieval = store.retrieve().await;

      {
        let Some(loader) = loader.upgrade() else {
          debug!("local loader dropped during cache retrieval");
          return;
        };
        if !loader.must_delete(retrieval) {
          completion(Ok(()));
          return;
        }
      }

      debug!("deleting invalid cached feed");
      let deletion = store.delete_cached_feed().await;

      let Some(_loader) = loader.upgrade() else {
        debug!("local loader dropped during cache deletion");
        return;
      };
      completion(deletion.map_err(CacheError::DeletionFailed));
    })
  }
}

fn to_local(feed: &[FeedItem]) -> Vec<LocalFeedItem> {
  feed.iter().map(LocalFeedItem::from).collect()
}

fn to_models(feed: Vec<LocalFeedItem>) -> Vec<FeedItem> {
  feed.into_iter().map(FeedItem::from).collect()
}
