//! Readings and the JSON views derived from them.
//!
//! A [`Reading`] is an immutable point sample. The view types are what the
//! HTTP layer serialises; they carry the °F and heat-index values computed
//! from the stored °C / %RH columns.

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  area::{Area, Bounds, Center},
  heat::{c_to_f, heat_index, round_to},
  time::sqlite_ts_millis,
};

// ─── Stored sample ───────────────────────────────────────────────────────────

/// One row of the `readings` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
  pub device_id:         String,
  /// UTC, `YYYY-MM-DD HH:MM:SS`.
  pub timestamp:         String,
  pub lat:               f64,
  pub lon:               f64,
  pub location_accuracy: f64,
  pub temp_c:            f64,
  pub humidity_rh:       f64,
  pub lux:               f64,
  pub uv_index:          f64,
  pub accel_x:           f64,
  pub accel_y:           f64,
  pub accel_z:           f64,
}

// ─── Per-device views ────────────────────────────────────────────────────────

/// Latest position and climate of one device, for map markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceLocation {
  pub device_id:    String,
  pub label:        String,
  pub lat:          f64,
  pub lon:          f64,
  pub timestamp:    String,
  pub temp_c:       f64,
  pub temp_f:       f64,
  pub humidity_rh:  f64,
  pub heat_index_f: f64,
}

impl DeviceLocation {
  pub fn new(
    device_id: String,
    lat: f64,
    lon: f64,
    timestamp: String,
    temp_c: f64,
    rh: f64,
  ) -> Self {
    let temp_f = c_to_f(temp_c);
    Self {
      label: device_id.clone(),
      device_id,
      lat,
      lon,
      timestamp,
      temp_c,
      temp_f: round_to(temp_f, 1),
      humidity_rh: round_to(rh, 1),
      heat_index_f: heat_index(temp_f, rh),
    }
  }
}

/// One point of a device's chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSeriesPoint {
  pub timestamp:    String,
  pub temp_c:       f64,
  pub temp_f:       f64,
  pub humidity_rh:  f64,
  pub heat_index_f: f64,
}

impl DeviceSeriesPoint {
  pub fn new(timestamp: String, temp_c: f64, rh: f64) -> Self {
    let temp_f = c_to_f(temp_c);
    Self {
      timestamp,
      temp_c,
      temp_f: round_to(temp_f, 2),
      humidity_rh: round_to(rh, 2),
      heat_index_f: heat_index(temp_f, rh),
    }
  }
}

// ─── Area views ──────────────────────────────────────────────────────────────

/// Raw SQL aggregate over the readings that fall inside one area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaStats {
  pub n_readings: i64,
  pub avg_temp_c: Option<f64>,
  pub avg_rh:     Option<f64>,
  /// Newest timestamp among the aggregated readings.
  pub max_ts:     Option<String>,
}

struct Averages {
  temp_c:       Option<f64>,
  temp_f:       Option<f64>,
  rh:           Option<f64>,
  heat_index_f: Option<f64>,
}

impl AreaStats {
  fn averages(&self) -> Averages {
    let temp_f = self.avg_temp_c.map(c_to_f);
    let heat_index_f = match (temp_f, self.avg_rh) {
      (Some(t), Some(h)) => Some(heat_index(t, h)),
      _ => None,
    };
    Averages { temp_c: self.avg_temp_c, temp_f, rh: self.avg_rh, heat_index_f }
  }
}

/// Windowed aggregate for one area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaAggregate {
  pub area_id:          String,
  pub name:             String,
  pub bounds:           Bounds,
  pub center:           Center,
  pub window_minutes:   i64,
  pub n_readings:       i64,
  pub avg_temp_c:       Option<f64>,
  pub avg_temp_f:       Option<f64>,
  pub avg_humidity_rh:  Option<f64>,
  pub avg_heat_index_f: Option<f64>,
  /// Newest reading, epoch milliseconds, for local-time rendering.
  pub timestamp_ms:     Option<i64>,
  pub timestamp_utc:    Option<String>,
}

impl AreaAggregate {
  pub fn new(area: Area, window_minutes: i64, stats: AreaStats) -> Result<Self> {
    let avg = stats.averages();
    let timestamp_ms = stats.max_ts.as_deref().map(sqlite_ts_millis).transpose()?;
    Ok(Self {
      center: area.bounds.center(),
      area_id: area.area_id,
      name: area.name,
      bounds: area.bounds,
      window_minutes,
      n_readings: stats.n_readings,
      avg_temp_c: avg.temp_c.map(|v| round_to(v, 3)),
      avg_temp_f: avg.temp_f.map(|v| round_to(v, 2)),
      avg_humidity_rh: avg.rh.map(|v| round_to(v, 2)),
      avg_heat_index_f: avg.heat_index_f,
      timestamp_ms,
      timestamp_utc: stats.max_ts,
    })
  }

  pub fn has_data(&self) -> bool {
    self.n_readings > 0 && self.avg_temp_f.is_some()
  }
}

/// One time bucket of an area series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSeriesBucket {
  pub bucket_minutes:   i64,
  /// Bucket start, epoch milliseconds.
  pub timestamp_ms:     i64,
  pub n_readings:       i64,
  pub avg_temp_f:       Option<f64>,
  pub avg_humidity_rh:  Option<f64>,
  pub avg_heat_index_f: Option<f64>,
  pub timestamp_utc:    Option<String>,
}

impl AreaSeriesBucket {
  pub fn new(bucket_minutes: i64, bucket_start_s: i64, stats: AreaStats) -> Self {
    let avg = stats.averages();
    Self {
      bucket_minutes,
      timestamp_ms: bucket_start_s * 1000,
      n_readings: stats.n_readings,
      avg_temp_f: avg.temp_f.map(|v| round_to(v, 2)),
      avg_humidity_rh: avg.rh.map(|v| round_to(v, 2)),
      avg_heat_index_f: avg.heat_index_f,
      timestamp_utc: stats.max_ts,
    }
  }
}

/// Bucketed series for one area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSeries {
  pub area_id:        String,
  pub name:           String,
  pub hours:          i64,
  pub bucket_minutes: i64,
  pub series:         Vec<AreaSeriesBucket>,
}

// ─── Sample logs ─────────────────────────────────────────────────────────────

/// A row of the lux log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuxSample {
  pub lux:             f64,
  pub battery_voltage: f64,
  pub kerberos:        String,
  /// Epoch milliseconds.
  pub ts:              i64,
}

/// A row of the rht log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RhtSample {
  pub rh:         f64,
  pub t:          f64,
  pub heat_index: f64,
  /// Epoch milliseconds.
  pub ts:         i64,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::area::AREA_SEEDS;

  #[test]
  fn device_location_derives_fahrenheit_and_heat_index() {
    let loc = DeviceLocation::new(
      "d_demo_x_00".into(),
      42.36,
      -71.09,
      "2025-07-04 12:00:00".into(),
      32.222,
      50.04,
    );
    assert_eq!(loc.label, "d_demo_x_00");
    assert_eq!(loc.temp_f, 90.0);
    assert_eq!(loc.humidity_rh, 50.0);
    assert_eq!(loc.heat_index_f, 95.0);
  }

  #[test]
  fn empty_area_stats_give_nulls() {
    let agg = AreaAggregate::new(AREA_SEEDS[1].to_area(), 10, AreaStats::default())
      .unwrap();
    assert_eq!(agg.n_readings, 0);
    assert!(agg.avg_temp_f.is_none());
    assert!(agg.avg_heat_index_f.is_none());
    assert!(agg.timestamp_ms.is_none());
    assert!(!agg.has_data());

    let json = serde_json::to_value(&agg).unwrap();
    assert!(json["avg_temp_c"].is_null());
    assert_eq!(json["bounds"]["min_lat"], 42.3566);
  }

  #[test]
  fn area_aggregate_parses_max_timestamp() {
    let stats = AreaStats {
      n_readings: 4,
      avg_temp_c: Some(25.123_456),
      avg_rh:     Some(55.556),
      max_ts:     Some("1970-01-01 00:01:00".into()),
    };
    let agg = AreaAggregate::new(AREA_SEEDS[0].to_area(), 10, stats).unwrap();
    assert_eq!(agg.timestamp_ms, Some(60_000));
    assert_eq!(agg.avg_temp_c, Some(25.123));
    assert_eq!(agg.avg_humidity_rh, Some(55.56));
    assert!(agg.has_data());
  }

  #[test]
  fn bucket_start_is_reported_in_millis() {
    let bucket = AreaSeriesBucket::new(5, 300, AreaStats {
      n_readings: 1,
      avg_temp_c: Some(0.0),
      avg_rh:     Some(50.0),
      max_ts:     None,
    });
    assert_eq!(bucket.timestamp_ms, 300_000);
    assert_eq!(bucket.avg_temp_f, Some(32.0));
  }
}
