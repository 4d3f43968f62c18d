//! Serde-deserializable types matching the feed endpoint's JSON payload.
//!
//! These types are separate from domain types so the wire format can change
//! without touching `FeedItem` or the cache representation.

use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use crate::feed::FeedItem;

// ============================================================================
// Feed endpoint response
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiFeedResponse {
  pub items: Vec<RemoteFeedItem>,
}

/// One feed item exactly as the endpoint sends it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFeedItem {
  pub id: Uuid,
  pub description: Option<String>,
  pub location: Option<String>,
  pub image: Url,
}

impl From<RemoteFeedItem> for FeedItem {
  fn from(item: RemoteFeedItem) -> Self {
    FeedItem {
      id: item.id,
      description: item.description,
      location: item.location,
      image_url: item.image,
    }
  }
}
