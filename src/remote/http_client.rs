//! Transport boundary used by the remote loader.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Raw response from the transport: status code and body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
  pub status: u16,
  pub body: Vec<u8>,
}

impl HttpResponse {
  pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
    Self {
      status,
      body: body.into(),
    }
  }
}

/// Failure to get any response at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
  #[error("request timed out: {0}")]
  Timeout(String),

  #[error("transport error: {0}")]
  Transport(String),
}

/// Issues GET requests.
///
/// Implementations complete every call exactly once. Any HTTP status counts as
/// a successful round trip; only failing to obtain a response is an error.
#[async_trait]
pub trait HttpClient: Send + Sync {
  async fn get(&self, url: &Url) -> Result<HttpResponse, HttpClientError>;
}
