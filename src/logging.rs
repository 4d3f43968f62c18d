//! Tracing subscriber setup for the binary.

use color_eyre::{eyre::eyre, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Environment variable holding a filter directive.
pub const LOG_ENV_VAR: &str = "FEEDCACHE_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber.
///
/// The filter comes from `FEEDCACHE_LOG`, then `log.level`, then `info`;
/// `verbose` forces `debug`. Logs go to `log.file` when set, stderr otherwise.
/// Keep the returned guard alive until exit so buffered file output is
/// flushed.
pub fn init(config: &LogConfig, verbose: bool) -> Result<Option<WorkerGuard>> {
  let filter = env_filter(config, verbose, std::env::var(LOG_ENV_VAR).ok())?;

  let builder = tracing_subscriber::fmt().with_env_filter(filter);

  match &config.file {
    Some(path) => {
      let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
      let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("Log file path has no file name: {}", path.display()))?;
      std::fs::create_dir_all(dir)
        .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

      let appender = tracing_appender::rolling::never(dir, file_name);
      let (writer, guard) = tracing_appender::non_blocking(appender);
      builder
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("Failed to install tracing subscriber: {}", e))?;
      Ok(Some(guard))
    }
    None => {
      builder
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| eyre!("Failed to install tracing subscriber: {}", e))?;
      Ok(None)
    }
  }
}

/// Pick the filter: `verbose` wins, then `env` (the `FEEDCACHE_LOG` value),
/// then `log.level`, then `info`.
fn env_filter(config: &LogConfig, verbose: bool, env: Option<String>) -> Result<EnvFilter> {
  if verbose {
    return Ok(EnvFilter::new("debug"));
  }

  match env {
    Some(directive) => EnvFilter::try_new(&directive)
      .map_err(|e| eyre!("Invalid {} value '{}': {}", LOG_ENV_VAR, directive, e)),
    None => {
      let directive = config.level.as_deref().unwrap_or(DEFAULT_DIRECTIVE);
      EnvFilter::try_new(directive).map_err(|e| eyre!("Invalid log level '{}': {}", directive, e))
    }
  }
}
