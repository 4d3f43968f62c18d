//! Feed acquisition and caching.
//!
//! `remote` fetches and decodes the feed, `cache` persists it and decides
//! whether a cached copy is still usable, and `feed` holds the domain type
//! plus the loader that combines both.

pub mod cache;
pub mod config;
pub mod feed;
pub mod logging;
pub mod remote;

#[cfg(test)]
mod test_support;
