//! HTTP transport backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::http_client::{HttpClient, HttpClientError, HttpResponse};

const USER_AGENT: &str = concat!("feedcache/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed [`HttpClient`].
#[derive(Clone)]
pub struct ReqwestHttpClient {
  client: Client,
}

impl ReqwestHttpClient {
  pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
    let client = Client::builder()
      .timeout(timeout)
      .user_agent(USER_AGENT)
      .build()?;

    Ok(Self { client })
  }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
  async fn get(&self, url: &Url) -> Result<HttpResponse, HttpClientError> {
    let response = self
      .client
      .get(url.clone())
      .send()
      .await
      .map_err(map_transport_error)?;

    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(map_transport_error)?;

    Ok(HttpResponse::new(status, body.to_vec()))
  }
}

fn map_transport_error(error: reqwest::Error) -> HttpClientError {
  if error.is_timeout() {
    HttpClientError::Timeout(error.to_string())
  } else {
    HttpClientError::Transport(error.to_string())
  }
}
