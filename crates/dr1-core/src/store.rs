//! The `SensorStore` trait.
//!
//! Implemented by storage backends (e.g. `dr1-store-sqlite`). The API and
//! server crates depend on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::reading::{
  AreaAggregate, AreaSeries, DeviceLocation, DeviceSeriesPoint, LuxSample, RhtSample,
};

/// What a call to [`SensorStore::ensure_seeded`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
  /// The thresholds were met; nothing was written.
  AlreadySeeded { devices: i64, readings: i64 },
  /// The demo tables were purged and regenerated.
  Regenerated { devices: i64, readings: i64 },
}

impl SeedOutcome {
  pub fn regenerated(&self) -> bool { matches!(self, SeedOutcome::Regenerated { .. }) }
}

/// Abstraction over the DR1 reading database and the lux/rht sample logs.
///
/// All methods return `Send` futures so the trait can be used behind `axum`
/// on a multi-threaded tokio runtime.
pub trait SensorStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Demo data ─────────────────────────────────────────────────────────

  /// Make sure the demo dataset exists, regenerating it when the device or
  /// reading count is below the configured thresholds.
  fn ensure_seeded(
    &self,
  ) -> impl Future<Output = Result<SeedOutcome, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Latest reading of every device, ordered by device id.
  fn latest_locations(
    &self,
  ) -> impl Future<Output = Result<Vec<DeviceLocation>, Self::Error>> + Send + '_;

  /// The newest `limit` readings of one device, oldest first.
  fn device_series(
    &self,
    device_id: String,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<DeviceSeriesPoint>, Self::Error>> + Send + '_;

  /// Per-area aggregate over readings newer than `now - window_minutes`.
  fn area_aggregates(
    &self,
    window_minutes: i64,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<AreaAggregate>, Self::Error>> + Send + '_;

  /// Bucketed series for one area over the last `hours`. Returns `None` if
  /// the area does not exist.
  fn area_series(
    &self,
    area_id: String,
    bucket_minutes: i64,
    hours: i64,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<AreaSeries>, Self::Error>> + Send + '_;

  // ── Sample logs ───────────────────────────────────────────────────────

  /// Append a lux sample stamped with the current time.
  fn log_lux(
    &self,
    lux: f64,
    battery_voltage: f64,
    kerberos: String,
  ) -> impl Future<Output = Result<LuxSample, Self::Error>> + Send + '_;

  /// Lux samples for `kerberos` from the last `minutes`, newest first.
  /// Returns `None` if nothing has ever been logged.
  fn lux_history(
    &self,
    kerberos: String,
    minutes: i64,
  ) -> impl Future<Output = Result<Option<Vec<LuxSample>>, Self::Error>> + Send + '_;

  /// Append an rht sample (heat index computed from `t` in °F) and return
  /// the samples from the last `history_secs` seconds, or all of them,
  /// newest first.
  fn log_rht(
    &self,
    rh: f64,
    t: f64,
    history_secs: Option<i64>,
  ) -> impl Future<Output = Result<Vec<RhtSample>, Self::Error>> + Send + '_;
}
