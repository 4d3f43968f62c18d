use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable that overrides `feed.url`.
pub const URL_ENV_VAR: &str = "FEEDCACHE_URL";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub feed: FeedConfig,
  #[serde(default)]
  pub http: HttpConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedConfig {
  /// Endpoint serving the feed JSON
  pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
  /// Whole-request timeout in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl Default for HttpConfig {
  fn default() -> Self {
    Self {
      timeout_secs: default_timeout_secs(),
    }
  }
}

fn default_timeout_secs() -> u64 {
  30
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
  /// SQLite database path (defaults to $XDG_DATA_HOME/feedcache/cache.db)
  pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
  /// Filter directive, e.g. "info" or "feedcache=debug"
  pub level: Option<String>,
  /// Write logs to this file instead of stderr
  pub file: Option<PathBuf>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./feedcache.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/feedcache/config.yaml
  ///
  /// Without a config file every setting takes its default.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  /// Apply the feed URL overrides.
  ///
  /// `env_url` (from `FEEDCACHE_URL`) replaces `feed.url`, and `cli_url`
  /// (from `--url`) replaces both.
  pub fn apply_overrides(&mut self, env_url: Option<String>, cli_url: Option<String>) {
    if let Some(url) = cli_url.or(env_url) {
      self.feed.url = Some(url);
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("feedcache.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("feedcache").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(contents)
  }

  /// The feed endpoint, validated.
  pub fn feed_url(&self) -> Result<Url> {
    let raw = self.feed.url.as_deref().ok_or_else(|| {
      eyre!(
        "No feed URL configured. Set feed.url in the config file, \
         the {} environment variable, or pass --url.",
        URL_ENV_VAR
      )
    })?;

    Url::parse(raw).map_err(|e| eyre!("Invalid feed URL '{}': {}", raw, e))
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.http.timeout_secs)
  }
}
