//! Cache staleness policy.

use chrono::{DateTime, Days, Utc};

const MAX_CACHE_AGE_IN_DAYS: u64 = 7;

/// Whether a feed cached at `timestamp` may still be served at `now`.
///
/// The cache expires once `now` reaches `timestamp` plus seven calendar days.
pub fn is_valid(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
  match timestamp.checked_add_days(Days::new(MAX_CACHE_AGE_IN_DAYS)) {
    Some(max_age) => now < max_age,
    None => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone};

  fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 28, 12, 30, 0).unwrap()
  }

  fn seven_days_before(date: DateTime<Utc>) -> DateTime<Utc> {
    date.checked_sub_days(Days::new(7)).unwrap()
  }

  #[test]
  fn test_less_than_seven_days_old_is_valid() {
    let now = fixed_now();
    let timestamp = seven_days_before(now) + Duration::seconds(1);

    assert!(is_valid(timestamp, now));
  }

  #[test]
  fn test_exactly_seven_days_old_is_invalid() {
    let now = fixed_now();
    let timestamp = seven_days_before(now);

    assert!(!is_valid(timestamp, now));
  }

  #[test]
  fn test_more_than_seven_days_old_is_invalid() {
    let now = fixed_now();
    let timestamp = seven_days_before(now) - Duration::seconds(1);

    assert!(!is_valid(timestamp, now));
  }

  #[test]
  fn test_fresh_cache_is_valid() {
    let now = fixed_now();

    assert!(is_valid(now, now));
  }

  #[test]
  fn test_unrepresentable_expiry_is_invalid() {
    assert!(!is_valid(DateTime::<Utc>::MAX_UTC, fixed_now()));
  }
}
