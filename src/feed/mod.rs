mod cached_loader;
mod types;

pub use cached_loader::CachedFeedLoader;
pub use types::FeedItem;
