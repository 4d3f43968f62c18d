//! Test doubles and fixtures shared by unit tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use url::Url;
use uuid::Uuid;

use crate::cache::{CachedFeed, FeedStore, LocalFeedItem, StoreError};
use crate::feed::FeedItem;
use crate::remote::{HttpClient, HttpClientError, HttpResponse};

/// Install a test-writer tracing subscriber. Safe to call from every test.
pub fn init_test_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_test_writer()
    .try_init();
}

pub fn any_url() -> Url {
  Url::parse("http://any-url.com/").unwrap()
}

pub fn any_store_error() -> StoreError {
  StoreError::new("any error")
}

pub fn unique_item() -> FeedItem {
  FeedItem::new(
    Uuid::new_v4(),
    Some("any".into()),
    Some("any".into()),
    any_url(),
  )
}

/// Two unique items, as domain models and as their cache representation.
pub fn unique_feed() -> (Vec<FeedItem>, Vec<LocalFeedItem>) {
  let models = vec![unique_item(), unique_item()];
  let local = models.iter().map(LocalFeedItem::from).collect();
  (models, local)
}

/// Results queued by a test and consumed, in order, by the double.
///
/// A result queued before the call is picked up immediately; a call made
/// before anything is queued waits for the test to queue one.
struct Completions<T> {
  tx: mpsc::UnboundedSender<T>,
  rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<T>>,
}

impl<T> Completions<T> {
  fn new() -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      tx,
      rx: tokio::sync::Mutex::new(rx),
    }
  }

  fn push(&self, value: T) {
    self.tx.send(value).expect("receiver lives as long as the double");
  }

  async fn next(&self) -> T {
    self
      .rx
      .lock()
      .await
      .recv()
      .await
      .expect("sender lives as long as the double")
  }
}

// ============================================================================
// Feed store spy
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ReceivedMessage {
  DeleteCachedFeed,
  Insert(Vec<LocalFeedItem>, DateTime<Utc>),
  Retrieve,
}

pub struct FeedStoreSpy {
  messages: Mutex<Vec<ReceivedMessage>>,
  deletions: Completions<Result<(), StoreError>>,
  insertions: Completions<Result<(), StoreError>>,
  retrievals: Completions<Result<Option<CachedFeed>, StoreError>>,
}

impl FeedStoreSpy {
  pub fn new() -> Self {
    Self {
      messages: Mutex::new(Vec::new()),
      deletions: Completions::new(),
      insertions: Completions::new(),
      retrievals: Completions::new(),
    }
  }

  pub fn received_messages(&self) -> Vec<ReceivedMessage> {
    self.messages.lock().unwrap().clone()
  }

  /// Wait until the store has received `count` messages.
  pub async fn wait_for_messages(&self, count: usize) {
    tokio::time::timeout(Duration::from_secs(1), async {
      while self.received_messages().len() < count {
        tokio::task::yield_now().await;
      }
    })
    .await
    .expect("timed out waiting for store messages");
  }

  pub fn complete_deletion(&self, error: StoreError) {
    self.deletions.push(Err(error));
  }

  pub fn complete_deletion_successfully(&self) {
    self.deletions.push(Ok(()));
  }

  pub fn complete_insertion(&self, error: StoreError) {
    self.insertions.push(Err(error));
  }

  pub fn complete_insertion_successfully(&self) {
    self.insertions.push(Ok(()));
  }

  pub fn complete_retrieval(&self, error: StoreError) {
    self.retrievals.push(Err(error));
  }

  pub fn complete_retrieval_with_empty_cache(&self) {
    self.retrievals.push(Ok(None));
  }

  pub fn complete_retrieval_with(&self, feed: Vec<LocalFeedItem>, timestamp: DateTime<Utc>) {
    self
      .retrievals
      .push(Ok(Some(CachedFeed { feed, timestamp })));
  }

  fn record(&self, message: ReceivedMessage) {
    self.messages.lock().unwrap().push(message);
  }
}

#[async_trait]
impl FeedStore for FeedStoreSpy {
  async fn delete_cached_feed(&self) -> Result<(), StoreError> {
    self.record(ReceivedMessage::DeleteCachedFeed);
    self.deletions.next().await
  }

  async fn insert(
    &self,
    feed: Vec<LocalFeedItem>,
    timestamp: DateTime<Utc>,
  ) -> Result<(), StoreError> {
    self.record(ReceivedMessage::Insert(feed, timestamp));
    self.insertions.next().await
  }

  async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError> {
    self.record(ReceivedMessage::Retrieve);
    self.retrievals.next().await
  }
}

// ============================================================================
// HTTP client spy
// ============================================================================

pub struct HttpClientSpy {
  requested_urls: Mutex<Vec<Url>>,
  responses: Completions<Result<HttpResponse, HttpClientError>>,
}

impl HttpClientSpy {
  pub fn new() -> Self {
    Self {
      requested_urls: Mutex::new(Vec::new()),
      responses: Completions::new(),
    }
  }

  pub fn requested_urls(&self) -> Vec<Url> {
    self.requested_urls.lock().unwrap().clone()
  }

  pub fn complete_with_error(&self, error: HttpClientError) {
    self.responses.push(Err(error));
  }

  pub fn complete_with_status(&self, status: u16, body: Vec<u8>) {
    self.responses.push(Ok(HttpResponse::new(status, body)));
  }
}

#[async_trait]
impl HttpClient for HttpClientSpy {
  async fn get(&self, url: &Url) -> Result<HttpResponse, HttpClientError> {
    self.requested_urls.lock().unwrap().push(url.clone());
    self.responses.next().await
  }
}

// ============================================================================
// Feed store behaviour shared by every store implementation
// ============================================================================

pub mod store_specs {
  use super::*;

  async fn insert(sut: &impl FeedStore, feed: Vec<LocalFeedItem>, timestamp: DateTime<Utc>) {
    sut
      .insert(feed, timestamp)
      .await
      .expect("expected insertion to succeed");
  }

  pub async fn assert_retrieve_delivers_empty_on_empty_cache(sut: &impl FeedStore) {
    assert_eq!(sut.retrieve().await, Ok(None));
  }

  pub async fn assert_retrieve_has_no_side_effects_on_empty_cache(sut: &impl FeedStore) {
    assert_eq!(sut.retrieve().await, Ok(None));
    assert_eq!(sut.retrieve().await, Ok(None));
  }

  pub async fn assert_retrieve_delivers_found_values_on_non_empty_cache(sut: &impl FeedStore) {
    let (_, feed) = unique_feed();
    let timestamp = Utc::now();

    insert(sut, feed.clone(), timestamp).await;

    assert_eq!(
      sut.retrieve().await,
      Ok(Some(CachedFeed { feed, timestamp }))
    );
  }

  pub async fn assert_retrieve_has_no_side_effects_on_non_empty_cache(sut: &impl FeedStore) {
    let (_, feed) = unique_feed();
    let timestamp = Utc::now();
    let expected = CachedFeed {
      feed: feed.clone(),
      timestamp,
    };

    insert(sut, feed, timestamp).await;

    assert_eq!(sut.retrieve().await, Ok(Some(expected.clone())));
    assert_eq!(sut.retrieve().await, Ok(Some(expected)));
  }

  pub async fn assert_insert_overrides_previously_inserted_cache(sut: &impl FeedStore) {
    insert(sut, unique_feed().1, Utc::now()).await;

    let (_, latest_feed) = unique_feed();
    let latest_timestamp = Utc::now();
    insert(sut, latest_feed.clone(), latest_timestamp).await;

    assert_eq!(
      sut.retrieve().await,
      Ok(Some(CachedFeed {
        feed: latest_feed,
        timestamp: latest_timestamp
      }))
    );
  }

  pub async fn assert_delete_has_no_side_effects_on_empty_cache(sut: &impl FeedStore) {
    assert_eq!(sut.delete_cached_feed().await, Ok(()));
    assert_eq!(sut.retrieve().await, Ok(None));
  }

  pub async fn assert_delete_empties_previously_inserted_cache(sut: &impl FeedStore) {
    insert(sut, unique_feed().1, Utc::now()).await;

    assert_eq!(sut.delete_cached_feed().await, Ok(()));
    assert_eq!(sut.retrieve().await, Ok(None));
  }
}
