use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use feedcache::cache::{CacheSource, LocalFeedLoader, SqliteFeedStore, SystemClock};
use feedcache::config::{Config, URL_ENV_VAR};
use feedcache::feed::{CachedFeedLoader, FeedItem};
use feedcache::logging;
use feedcache::remote::{RemoteFeedLoader, ReqwestHttpClient};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "feedcache")]
#[command(about = "Fetch a remote feed and keep it cached for offline use")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/feedcache/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Feed URL, overrides the config file and FEEDCACHE_URL
  #[arg(long)]
  url: Option<String>,

  /// Print items as JSON
  #[arg(long)]
  json: bool,

  /// Enable debug logging
  #[arg(short, long)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
  /// Load from the network, falling back to the cache when offline (default)
  Sync,
  /// Load from the network only and refresh the cache
  Fetch,
  /// Show the cached feed without touching the network
  Show,
  /// Delete the cached feed if it is unreadable or expired
  Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = Config::load(args.config.as_deref())?;
  config.apply_overrides(std::env::var(URL_ENV_VAR).ok(), args.url.clone());

  let _log_guard = logging::init(&config.log, args.verbose)?;

  let store = match &config.cache.path {
    Some(path) => SqliteFeedStore::open(path)?,
    None => SqliteFeedStore::open_default()?,
  };
  let local = LocalFeedLoader::new(Arc::new(store), SystemClock);

  match args.command.unwrap_or(Command::Sync) {
    Command::Sync => {
      let loader = CachedFeedLoader::new(remote_loader(&config)?, local);
      let result = loader.load().await?;
      let count = result.data.len();
      match result.source {
        CacheSource::Network => info!(count, "feed loaded from network"),
        CacheSource::Offline => info!(count, "network unavailable, showing cached feed"),
      }
      print_feed(&result.data, args.json)?;
    }
    Command::Fetch => {
      let feed = remote_loader(&config)?.load().await?;
      local.save(&feed).await?;
      print_feed(&feed, args.json)?;
    }
    Command::Show => {
      let feed = local.load().await?;
      print_feed(&feed, args.json)?;
    }
    Command::Validate => {
      local.validate_cache().await?;
      info!("cache validated");
    }
  }

  Ok(())
}

fn remote_loader(config: &Config) -> Result<RemoteFeedLoader<ReqwestHttpClient>> {
  let url = config.feed_url()?;
  let client = ReqwestHttpClient::new(config.request_timeout())
    .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

  Ok(RemoteFeedLoader::new(Arc::new(client), url))
}

fn print_feed(feed: &[FeedItem], json: bool) -> Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(feed)?);
    return Ok(());
  }

  for item in feed {
    println!(
      "{}\t{}\t{}\t{}",
      item.id,
      item.description.as_deref().unwrap_or("-"),
      item.location.as_deref().unwrap_or("-"),
      item.image_url
    );
  }

  Ok(())
}
