//! Clocks that timestamp saves and judge cache age.

use chrono::{DateTime, Utc};

/// Source of the current instant.
///
/// Any `Fn() -> DateTime<Utc>` closure is a clock, which keeps tests
/// deterministic.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

impl<F> Clock for F
where
  F: Fn() -> DateTime<Utc> + Send + Sync,
{
  fn now(&self) -> DateTime<Utc> {
    self()
  }
}
