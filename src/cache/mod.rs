//! Local feed cache.
//!
//! This module provides:
//! - The `FeedStore` contract any persistence backend implements
//! - The staleness policy (a cached feed is served for seven days)
//! - `LocalFeedLoader`, which saves (delete, then insert) and loads
//!   (retrieve, then validate) against a store
//! - SQLite and in-memory stores

mod clock;
mod local_loader;
mod memory;
pub mod policy;
mod storage;
mod traits;

pub use clock::{Clock, SystemClock};
pub use local_loader::{CacheError, LoadResult, LocalFeedLoader, SaveResult};
pub use memory::InMemoryFeedStore;
pub use storage::SqliteFeedStore;
pub use traits::{CacheResult, CacheSource, CachedFeed, FeedStore, LocalFeedItem, StoreError};
