//! SQLite `datetime('now')`-style timestamps (`YYYY-MM-DD HH:MM:SS`, UTC).

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::{Error, Result};

pub const SQLITE_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_sqlite_ts(dt: DateTime<Utc>) -> String {
  dt.format(SQLITE_TS_FORMAT).to_string()
}

pub fn parse_sqlite_ts(s: &str) -> Result<DateTime<Utc>> {
  NaiveDateTime::parse_from_str(s, SQLITE_TS_FORMAT)
    .map(|naive| naive.and_utc())
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// Format a query cutoff. Instants outside years 0000..=9999 are pinned to
/// the nearest edge so the text still orders correctly against stored rows.
pub fn format_sqlite_cutoff(dt: DateTime<Utc>) -> String {
  let first = NaiveDate::from_ymd_opt(0, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
  let last = NaiveDate::from_ymd_opt(9999, 12, 31).and_then(|d| d.and_hms_opt(23, 59, 59));
  let naive = dt.naive_utc();
  let pinned = match (first, last) {
    (Some(first), _) if naive < first => first,
    (_, Some(last)) if naive > last => last,
    _ => naive,
  };
  pinned.format(SQLITE_TS_FORMAT).to_string()
}

/// `now` minus `minutes`, or `None` when the result leaves chrono's range.
pub fn minutes_before(now: DateTime<Utc>, minutes: i64) -> Option<DateTime<Utc>> {
  TimeDelta::try_minutes(minutes).and_then(|d| now.checked_sub_signed(d))
}

/// `now` minus `hours`, or `None` when the result leaves chrono's range.
pub fn hours_before(now: DateTime<Utc>, hours: i64) -> Option<DateTime<Utc>> {
  TimeDelta::try_hours(hours).and_then(|d| now.checked_sub_signed(d))
}

/// Epoch-millisecond cutoff `span_ms` before `now_ms`. Saturates, so a huge
/// span means "everything" and a huge negative one means "nothing".
pub fn millis_before(now_ms: i64, span_ms: i64) -> i64 { now_ms.saturating_sub(span_ms) }

/// Milliseconds since the Unix epoch for a stored timestamp.
pub fn sqlite_ts_millis(s: &str) -> Result<i64> {
  Ok(parse_sqlite_ts(s)?.timestamp_millis())
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn format_drops_subseconds() {
    let dt = Utc.with_ymd_and_hms(2025, 7, 4, 9, 5, 3).unwrap()
      + chrono::Duration::milliseconds(750);
    assert_eq!(format_sqlite_ts(dt), "2025-07-04 09:05:03");
  }

  #[test]
  fn parse_roundtrips_whole_seconds() {
    let dt = Utc.with_ymd_and_hms(2025, 7, 4, 9, 5, 3).unwrap();
    assert_eq!(parse_sqlite_ts("2025-07-04 09:05:03").unwrap(), dt);
    assert_eq!(
      sqlite_ts_millis("1970-01-01 00:00:01").unwrap(),
      1000,
    );
  }

  #[test]
  fn cutoffs_are_pinned_to_four_digit_years() {
    let now = Utc.with_ymd_and_hms(2025, 7, 4, 9, 5, 3).unwrap();
    assert_eq!(format_sqlite_cutoff(now), "2025-07-04 09:05:03");
    assert_eq!(format_sqlite_cutoff(DateTime::<Utc>::MAX_UTC), "9999-12-31 23:59:59");
    assert_eq!(format_sqlite_cutoff(DateTime::<Utc>::MIN_UTC), "0000-01-01 00:00:00");
  }

  #[test]
  fn out_of_range_offsets_are_none() {
    let now = Utc.with_ymd_and_hms(2025, 7, 4, 9, 0, 0).unwrap();
    assert_eq!(
      minutes_before(now, 90),
      Some(Utc.with_ymd_and_hms(2025, 7, 4, 7, 30, 0).unwrap())
    );
    assert_eq!(hours_before(now, -1), Some(Utc.with_ymd_and_hms(2025, 7, 4, 10, 0, 0).unwrap()));
    assert!(minutes_before(now, i64::MAX).is_none());
    assert!(minutes_before(now, -i64::MAX).is_none());
    assert!(hours_before(now, i64::MAX).is_none());
    // Inside TimeDelta's range but past the last representable date.
    assert!(minutes_before(now, -(i64::MAX / 60_000)).is_none());
  }

  #[test]
  fn millis_cutoff_saturates() {
    assert_eq!(millis_before(10_000, 4_000), 6_000);
    assert_eq!(millis_before(10_000, i64::MAX), i64::MIN + 10_001);
    assert_eq!(millis_before(10_000, i64::MIN), i64::MAX);
  }

  #[test]
  fn parse_rejects_rfc3339() {
    assert!(matches!(
      parse_sqlite_ts("2025-07-04T09:05:03Z"),
      Err(Error::DateParse(_))
    ));
  }
}
