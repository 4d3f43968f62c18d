use serde::Serialize;
use url::Url;
use uuid::Uuid;

/// A single item of the feed, as the rest of the application sees it.
///
/// `id` identifies the item. Keeping ids unique within a feed is up to
/// whoever produced the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
  pub id: Uuid,
  pub description: Option<String>,
  pub location: Option<String>,
  pub image_url: Url,
}

impl FeedItem {
  pub fn new(
    id: Uuid,
    description: Option<String>,
    location: Option<String>,
    image_url: Url,
  ) -> Self {
    Self {
      id,
      description,
      location,
      image_url,
    }
  }
}
