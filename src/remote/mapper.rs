//! Validation and decoding of feed endpoint responses.

use tracing::warn;

use super::api_types::{ApiFeedResponse, RemoteFeedItem};
use super::loader::RemoteLoadError;

const STATUS_OK: u16 = 200;

/// Decode a feed response body into wire records.
///
/// Only a 200 response whose body is `{"items": [...]}` with well-formed items
/// is accepted. A wrong status and a malformed body both yield
/// [`RemoteLoadError::InvalidData`].
pub fn map(body: &[u8], status: u16) -> Result<Vec<RemoteFeedItem>, RemoteLoadError> {
  if status != STATUS_OK {
    warn!(status, "feed endpoint returned unexpected status");
    return Err(RemoteLoadError::InvalidData);
  }

  let response: ApiFeedResponse = serde_json::from_slice(body).map_err(|e| {
    warn!(error = %e, "failed to decode feed response");
    RemoteLoadError::InvalidData
  })?;

  Ok(response.items)
}
