//! Raw row types read out of SQLite and their conversion into the
//! `dr1-core` views.
//!
//! Row closures run on the connection thread and only copy columns out;
//! the derived values (°F, heat index, epoch millis) are computed afterwards
//! on the async side.

use dr1_core::{
  area::{Area, Bounds},
  reading::{AreaAggregate, AreaSeriesBucket, AreaStats, DeviceLocation, DeviceSeriesPoint},
};

use crate::Result;

// ─── Per-device rows ─────────────────────────────────────────────────────────

pub struct RawLocation {
  pub device_id:   String,
  pub lat:         f64,
  pub lon:         f64,
  pub timestamp:   String,
  pub temp_c:      f64,
  pub humidity_rh: f64,
}

impl RawLocation {
  pub fn into_location(self) -> DeviceLocation {
    DeviceLocation::new(
      self.device_id,
      self.lat,
      self.lon,
      self.timestamp,
      self.temp_c,
      self.humidity_rh,
    )
  }
}

pub struct RawSeriesPoint {
  pub timestamp:   String,
  pub temp_c:      f64,
  pub humidity_rh: f64,
}

impl RawSeriesPoint {
  pub fn into_point(self) -> DeviceSeriesPoint {
    DeviceSeriesPoint::new(self.timestamp, self.temp_c, self.humidity_rh)
  }
}

// ─── Area rows ───────────────────────────────────────────────────────────────

pub struct RawAreaAggregate {
  pub area_id:    String,
  pub name:       String,
  pub min_lon:    f64,
  pub min_lat:    f64,
  pub max_lon:    f64,
  pub max_lat:    f64,
  pub n_readings: Option<i64>,
  pub avg_temp_c: Option<f64>,
  pub avg_rh:     Option<f64>,
  pub max_ts:     Option<String>,
}

impl RawAreaAggregate {
  pub fn into_aggregate(self, window_minutes: i64) -> Result<AreaAggregate> {
    let area = Area {
      area_id: self.area_id,
      name:    self.name,
      bounds:  Bounds {
        min_lat: self.min_lat,
        min_lon: self.min_lon,
        max_lat: self.max_lat,
        max_lon: self.max_lon,
      },
    };
    let stats = AreaStats {
      n_readings: self.n_readings.unwrap_or(0),
      avg_temp_c: self.avg_temp_c,
      avg_rh:     self.avg_rh,
      max_ts:     self.max_ts,
    };
    Ok(AreaAggregate::new(area, window_minutes, stats)?)
  }
}

pub struct RawBucket {
  pub bucket_s:   i64,
  pub n_readings: Option<i64>,
  pub avg_temp_c: Option<f64>,
  pub avg_rh:     Option<f64>,
  pub max_ts:     Option<String>,
}

impl RawBucket {
  pub fn into_bucket(self, bucket_minutes: i64) -> AreaSeriesBucket {
    AreaSeriesBucket::new(bucket_minutes, self.bucket_s, AreaStats {
      n_readings: self.n_readings.unwrap_or(0),
      avg_temp_c: self.avg_temp_c,
      avg_rh:     self.avg_rh,
      max_ts:     self.max_ts,
    })
  }
}
