//! Remote feed loader: one GET, validated and mapped into domain items.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use super::http_client::{HttpClient, HttpClientError, HttpResponse};
use super::mapper;
use crate::feed::FeedItem;

/// Why a remote load failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RemoteLoadError {
  /// The endpoint could not be reached.
  #[error("could not reach the feed endpoint")]
  Connectivity,

  /// The endpoint answered, but not with a valid feed.
  #[error("the feed endpoint returned invalid data")]
  InvalidData,
}

/// Loads the feed from a fixed URL through an injected [`HttpClient`].
///
/// Every call issues exactly one request. Failures are never retried.
pub struct RemoteFeedLoader<H: HttpClient> {
  client: Arc<H>,
  url: Url,
}

impl<H: HttpClient + 'static> RemoteFeedLoader<H> {
  pub fn new(client: Arc<H>, url: Url) -> Self {
    Self { client, url }
  }

  /// Fetch and decode the feed.
  pub async fn load(&self) -> Result<Vec<FeedItem>, RemoteLoadError> {
    debug!(url = %self.url, "requesting remote feed");
    let response = self.client.get(&self.url).await;
    map_response(&self.url, response)
  }

  /// Fetch the feed on a background task and hand the result to `completion`.
  ///
  /// The task only holds a weak reference to the loader. If the loader is
  /// dropped before the response arrives, the response is discarded and
  /// `completion` never runs.
  pub fn spawn_load<F>(self: &Arc<Self>, completion: F) -> JoinHandle<()>
  where
    F: FnOnce(Result<Vec<FeedItem>, RemoteLoadError>) + Send + 'static,
  {
    let loader = Arc::downgrade(self);
    let client = Arc::clone(&self.client);
    let url = self.url.clone();

    tokio::spawn(async move {
      debug!(url = %url, "requesting remote feed");
      let response = client.get(&url).await;

      let Some(_loader) = loader.upgrade() else {
        debug!(url = %url, "remote loader dropped, discarding response");
        return;
      };
      completion(map_response(&url, response));
    })
  }
}

fn map_response(
  url: &Url,
  response: Result<HttpResponse, HttpClientError>,
) -> Result<Vec<FeedItem>, RemoteLoadError> {
  match response {
    Ok(response) => {
      let items = mapper::map(&response.body, response.status)?;
      debug!(url = %url, count = items.len(), "loaded remote feed");
      Ok(items.into_iter().map(FeedItem::from).collect())
    }
    Err(e) => {
      warn!(url = %url, error = %e, "feed request failed");
      Err(RemoteLoadError::Connectivity)
    }
  }
}
