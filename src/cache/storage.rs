//! SQLite feed store.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use url::Url;
use uuid::Uuid;

use super::traits::{CachedFeed, FeedStore, LocalFeedItem, StoreError};

/// SQLite-based feed store.
///
/// Every operation runs inside one transaction, so readers never observe a
/// half-written feed.
pub struct SqliteFeedStore {
  conn: Mutex<Connection>,
}

impl SqliteFeedStore {
  /// Open the store at the default location.
  pub fn open_default() -> Result<Self> {
    Self::open(&Self::default_path()?)
  }

  /// Open (or create) the store at `path`.
  pub fn open(path: &Path) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cache directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?;

    Self::with_connection(conn)
  }

  /// Open a store that lives only as long as this value.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory cache database: {}", e))?;

    Self::with_connection(conn)
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    conn
      .execute_batch(CACHE_SCHEMA)
      .map_err(|e| eyre!("Failed to run cache migrations: {}", e))?;

    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("feedcache").join("cache.db"))
  }

  fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
    self
      .conn
      .lock()
      .map_err(|e| StoreError::new(format!("Lock poisoned: {}", e)))
  }

  fn delete_all(&self) -> Result<(), StoreError> {
    let mut conn = self.lock()?;
    let tx = conn.transaction().map_err(StoreError::new)?;
    clear(&tx)?;
    tx.commit().map_err(StoreError::new)
  }

  fn replace(&self, feed: &[LocalFeedItem], timestamp: DateTime<Utc>) -> Result<(), StoreError> {
    let mut conn = self.lock()?;
    let tx = conn.transaction().map_err(StoreError::new)?;
    clear(&tx)?;

    tx.execute(
      "INSERT INTO feed_cache (id, timestamp) VALUES (1, ?)",
      params![timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)],
    )
    .map_err(StoreError::new)?;

    {
      let mut stmt = tx
        .prepare(
          "INSERT INTO feed_items (position, id, description, location, image_url)
           VALUES (?, ?, ?, ?, ?)",
        )
        .map_err(StoreError::new)?;

      for (position, item) in feed.iter().enumerate() {
        stmt
          .execute(params![
            position,
            item.id.to_string(),
            item.description,
            item.location,
            item.image_url.as_str(),
          ])
          .map_err(StoreError::new)?;
      }
    }

    tx.commit().map_err(StoreError::new)
  }

  fn read(&self) -> Result<Option<CachedFeed>, StoreError> {
    let conn = self.lock()?;

    let timestamp: Option<String> = conn
      .query_row("SELECT timestamp FROM feed_cache WHERE id = 1", [], |row| {
        row.get(0)
      })
      .optional()
      .map_err(StoreError::new)?;

    let Some(timestamp) = timestamp else {
      return Ok(None);
    };
    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
      .map_err(|e| StoreError::new(format!("Failed to parse cache timestamp '{}': {}", timestamp, e)))?
      .with_timezone(&Utc);

    // Get items in order
    let mut stmt = conn
      .prepare(
        "SELECT id, description, location, image_url FROM feed_items
         ORDER BY position",
      )
      .map_err(StoreError::new)?;

    let rows = stmt
      .query_map([], |row| {
        Ok((
          row.get::<_, String>(0)?,
          row.get::<_, Option<String>>(1)?,
          row.get::<_, Option<String>>(2)?,
          row.get::<_, String>(3)?,
        ))
      })
      .map_err(StoreError::new)?;

    let mut feed = Vec::new();
    for row in rows {
      let (id, description, location, image_url) = row.map_err(StoreError::new)?;
      feed.push(LocalFeedItem {
        id: Uuid::parse_str(&id).map_err(StoreError::new)?,
        description,
        location,
        image_url: Url::parse(&image_url).map_err(StoreError::new)?,
      });
    }

    Ok(Some(CachedFeed { feed, timestamp }))
  }
}

/// Schema for cache tables.
const CACHE_SCHEMA: &str = r#"
-- Snapshot metadata (at most one row)
CREATE TABLE IF NOT EXISTS feed_cache (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    timestamp TEXT NOT NULL
);

-- Cached items (preserves order)
CREATE TABLE IF NOT EXISTS feed_items (
    position INTEGER PRIMARY KEY,
    id TEXT NOT NULL,
    description TEXT,
    location TEXT,
    image_url TEXT NOT NULL
);
"#;

fn clear(conn: &Connection) -> Result<(), StoreError> {
  conn
    .execute_batch("DELETE FROM feed_items; DELETE FROM feed_cache;")
    .map_err(StoreError::new)
}

#[async_trait]
impl FeedStore for SqliteFeedStore {
  async fn delete_cached_feed(&self) -> Result<(), StoreError> {
    self.delete_all()
  }

  async fn insert(
    &self,
    feed: Vec<LocalFeedItem>,
    timestamp: DateTime<Utc>,
  ) -> Result<(), StoreError> {
    self.replace(&feed, timestamp)
  }

  async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError> {
    self.read()
  }
}
