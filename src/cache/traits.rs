//! Core traits and types for the caching system.

use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::feed::FeedItem;

/// Feed item as it crosses the persistence boundary.
///
/// Mirrors [`FeedItem`] field for field, but is its own type so the cache
/// format does not change whenever the domain type does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFeedItem {
  pub id: Uuid,
  pub description: Option<String>,
  pub location: Option<String>,
  pub image_url: Url,
}

impl From<&FeedItem> for LocalFeedItem {
  fn from(item: &FeedItem) -> Self {
    Self {
      id: item.id,
      description: item.description.clone(),
      location: item.location.clone(),
      image_url: item.image_url.clone(),
    }
  }
}

impl From<LocalFeedItem> for FeedItem {
  fn from(item: LocalFeedItem) -> Self {
    FeedItem {
      id: item.id,
      description: item.description,
      location: item.location,
      image_url: item.image_url,
    }
  }
}

/// The whole cache: items in order plus the instant they were saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFeed {
  pub feed: Vec<LocalFeedItem>,
  pub timestamp: DateTime<Utc>,
}

/// Opaque failure reported by a [`FeedStore`].
///
/// Clones share the same underlying cause, and two `StoreError`s are equal
/// only when they wrap that same cause.
#[derive(Debug, Clone, Error)]
#[error("{inner}")]
pub struct StoreError {
  inner: Arc<dyn StdError + Send + Sync + 'static>,
}

impl StoreError {
  pub fn new<E>(error: E) -> Self
  where
    E: Into<Box<dyn StdError + Send + Sync + 'static>>,
  {
    Self {
      inner: Arc::from(error.into()),
    }
  }
}

impl PartialEq for StoreError {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }
}

/// Persistence backend for the feed cache.
///
/// The store holds at most one [`CachedFeed`]. It owns no business logic and
/// is responsible for its own locking when shared.
#[async_trait]
pub trait FeedStore: Send + Sync {
  /// Remove the cached feed. Succeeds when there is nothing to remove.
  async fn delete_cached_feed(&self) -> Result<(), StoreError>;

  /// Replace the cached feed with `feed` saved at `timestamp`.
  async fn insert(&self, feed: Vec<LocalFeedItem>, timestamp: DateTime<Utc>)
    -> Result<(), StoreError>;

  /// The cached feed, or `None` when the cache is empty.
  async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError>;
}

/// Result from a cached load, including where the data came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from fresh network data.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
    }
  }

  /// Create a new cache result for offline mode.
  pub fn offline(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Offline,
    }
  }
}

/// Indicates where loaded data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from network
  Network,
  /// Network unavailable, serving cached data
  Offline,
}
