//! Demo data generator.
//!
//! Brings a demo database up to a known state: schema applied, the fixed
//! campus areas present, and (unless enough data already exists) a fresh
//! 12-hour random-walk dataset for 60 synthetic devices.
//!
//! Randomness comes from a caller-supplied generator so a fixed seed always
//! yields the same rows. Regeneration runs in one transaction; a failure
//! part-way leaves the previous dataset in place.
//!
//! Concurrent seeding of the same file from several processes is not
//! supported.

use std::{
  f64::consts::TAU,
  path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, Utc};
use dr1_core::{
  area::{AREA_SEEDS, Area, Bounds, seed_offsets},
  heat::round_to,
  reading::Reading,
  store::SeedOutcome,
  time::{format_sqlite_ts, minutes_before},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rusqlite::{Connection, Transaction};
use serde::Deserialize;

use crate::{Error, Layout, Result, schema::CONNECTION_PRAGMAS};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Thirty days.
pub const MAX_WINDOW_MINUTES: i64 = 30 * 24 * 60;
/// Device ids carry a two-digit index.
pub const MAX_DEVICES_PER_AREA: u32 = 100;

/// Generator knobs. The defaults reproduce the reference demo dataset:
/// 6 areas × 10 devices × 361 samples.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedOptions {
  /// Fixed seed for the pseudo-random generator.
  pub seed:             u64,
  /// Regenerate when fewer devices than this exist.
  pub min_devices:      i64,
  /// Regenerate when fewer readings than this exist.
  pub min_readings:     i64,
  pub devices_per_area: u32,
  /// Length of the generated history, ending at "now".
  pub window_minutes:   i64,
  pub step_minutes:     i64,
}

impl Default for SeedOptions {
  fn default() -> Self {
    Self {
      seed:             6900,
      min_devices:      30,
      min_readings:     30 * 60,
      devices_per_area: 10,
      window_minutes:   12 * 60,
      step_minutes:     2,
    }
  }
}

impl SeedOptions {
  /// Number of samples per device, both window edges included.
  pub fn points(&self) -> i64 { self.window_minutes / self.step_minutes + 1 }

  fn validate(&self) -> Result<()> {
    if self.step_minutes <= 0 {
      return Err(Error::InvalidSeedOptions("step_minutes must be positive".into()));
    }
    if !(0..=MAX_WINDOW_MINUTES).contains(&self.window_minutes) {
      return Err(Error::InvalidSeedOptions(format!(
        "window_minutes must be between 0 and {MAX_WINDOW_MINUTES}"
      )));
    }
    if self.devices_per_area > MAX_DEVICES_PER_AREA {
      return Err(Error::InvalidSeedOptions(format!(
        "devices_per_area must be at most {MAX_DEVICES_PER_AREA}"
      )));
    }
    Ok(())
  }

  pub fn rng(&self) -> StdRng { StdRng::seed_from_u64(self.seed) }
}

// ─── Entry points ────────────────────────────────────────────────────────────

pub const DEMO_USER_ID: &str = "u_demo_tester";

/// Largest per-step latitude move, in degrees.
const LAT_STEP: f64 = 0.00010;
/// Largest per-step longitude move, in degrees.
const LON_STEP: f64 = 0.00014;
/// Phase offset between neighbouring devices; cycles every 9 devices.
const DEVICE_PHASE_STEP: f64 = 0.15;

/// Ensure `<root>/database/dr1_demo.db` exists and holds demo data, and
/// return its path.
pub fn ensure_seeded(root: &Path, options: &SeedOptions) -> Result<PathBuf> {
  let layout = Layout::new(root);
  let schema = layout.prepare()?;
  let db_path = layout.db_path();

  let mut conn = Connection::open(&db_path)?;
  seed_connection(&mut conn, &schema, options, &mut options.rng(), Utc::now())?;
  Ok(db_path)
}

/// Apply `schema_sql`, insert the fixed areas, and regenerate the demo
/// dataset on `conn` if it is below the thresholds in `options`.
///
/// The dataset is a pure function of `rng`'s state and `now`.
pub fn seed_connection<R: Rng>(
  conn:       &mut Connection,
  schema_sql: &str,
  options:    &SeedOptions,
  rng:        &mut R,
  now:        DateTime<Utc>,
) -> Result<SeedOutcome> {
  options.validate()?;

  conn.execute_batch(CONNECTION_PRAGMAS)?;
  conn.execute_batch(schema_sql)?;
  insert_areas(conn)?;

  let devices = count_rows(conn, "devices")?;
  let readings = count_rows(conn, "readings")?;
  if devices >= options.min_devices && readings >= options.min_readings {
    tracing::debug!(devices, readings, "demo data already seeded");
    return Ok(SeedOutcome::AlreadySeeded { devices, readings });
  }

  tracing::info!(devices, readings, "demo data below threshold; regenerating");

  let tx = conn.transaction()?;
  reset(&tx)?;
  let (devices, readings) = regenerate(&tx, options, rng, now)?;
  tx.commit()?;

  tracing::info!(devices, readings, "demo data regenerated");
  Ok(SeedOutcome::Regenerated { devices, readings })
}

// ─── Steps ───────────────────────────────────────────────────────────────────

fn insert_areas(conn: &Connection) -> Result<()> {
  let mut stmt = conn.prepare(
    "INSERT OR IGNORE INTO areas (area_id, name, min_lon, min_lat, max_lon, max_lat)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
  )?;
  for seed in &AREA_SEEDS {
    let b = seed.bounds;
    stmt.execute(rusqlite::params![
      seed.area_id,
      seed.name,
      b.min_lon,
      b.min_lat,
      b.max_lon,
      b.max_lat,
    ])?;
  }
  Ok(())
}

fn count_rows(conn: &Connection, table: &'static str) -> Result<i64> {
  Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
}

/// Wipe the demo fact tables, children before parents. Areas are kept.
fn reset(tx: &Transaction<'_>) -> Result<()> {
  tx.execute_batch(
    "DELETE FROM device_status;
     DELETE FROM surveys;
     DELETE FROM readings;
     DELETE FROM devices;
     DELETE FROM users;",
  )?;
  Ok(())
}

pub(crate) fn load_areas(conn: &Connection) -> rusqlite::Result<Vec<Area>> {
  let mut stmt = conn.prepare(
    "SELECT area_id, name, min_lon, min_lat, max_lon, max_lat
     FROM areas
     ORDER BY area_id ASC",
  )?;
  stmt
    .query_map([], |row| {
      Ok(Area {
        area_id: row.get(0)?,
        name:    row.get(1)?,
        bounds:  Bounds {
          min_lon: row.get(2)?,
          min_lat: row.get(3)?,
          max_lon: row.get(4)?,
          max_lat: row.get(5)?,
        },
      })
    })?
    .collect()
}

/// A device being walked around its area.
#[derive(Debug, Clone)]
struct DemoDevice {
  device_id:     String,
  bounds:        Bounds,
  temp_c_offset: f64,
  rh_offset:     f64,
  lat:           f64,
  lon:           f64,
}

impl DemoDevice {
  /// One random-walk step, clamped to the area box.
  fn walk<R: Rng>(&mut self, rng: &mut R) {
    let lat = self.lat + rng.random_range(-LAT_STEP..=LAT_STEP);
    let lon = self.lon + rng.random_range(-LON_STEP..=LON_STEP);
    (self.lat, self.lon) = self.bounds.clamp(lat, lon);
  }

  /// The synthetic sample for this device's current position at `phase`.
  fn reading(&self, timestamp: String, phase: f64) -> Reading {
    let temp_c = 26.5 + self.temp_c_offset + 1.8 * phase.sin() + 0.4 * (phase * 0.4).sin();
    let rh = (54.0 + self.rh_offset + 7.0 * phase.cos() + 2.0 * (phase * 0.3).sin())
      .clamp(20.0, 95.0);

    Reading {
      device_id: self.device_id.clone(),
      timestamp,
      lat: round_to(self.lat, 6),
      lon: round_to(self.lon, 6),
      location_accuracy: 10.0,
      temp_c: round_to(temp_c, 3),
      humidity_rh: round_to(rh, 3),
      lux: 140.0 + 80.0 * phase.sin(),
      uv_index: 1.5 + 1.2 * (phase * 0.8).sin(),
      accel_x: 0.02 * phase.sin(),
      accel_y: 0.02 * phase.cos(),
      accel_z: 0.98,
    }
  }
}

fn regenerate<R: Rng>(
  tx:      &Transaction<'_>,
  options: &SeedOptions,
  rng:     &mut R,
  now:     DateTime<Utc>,
) -> Result<(i64, i64)> {
  tx.execute(
    "INSERT OR IGNORE INTO users (user_id, first_name, last_name, email, role)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![DEMO_USER_ID, "Demo", "Tester", "demo.tester@example.com", "tester"],
  )?;

  let areas = load_areas(tx)?;
  if areas.is_empty() {
    return Err(Error::NoAreas);
  }

  let mut devices = Vec::with_capacity(areas.len() * options.devices_per_area as usize);
  {
    let mut stmt = tx.prepare(
      "INSERT INTO devices (device_id, user_id, status, version)
       VALUES (?1, ?2, 'active', '1')",
    )?;
    for area in &areas {
      let (temp_c_offset, rh_offset) = seed_offsets(&area.area_id);
      for i in 0..options.devices_per_area {
        let device_id = format!("d_demo_{}_{i:02}", area.area_id);
        stmt.execute(rusqlite::params![device_id, DEMO_USER_ID])?;
        devices.push(DemoDevice {
          device_id,
          bounds: area.bounds,
          temp_c_offset,
          rh_offset,
          lat: area.bounds.min_lat,
          lon: area.bounds.min_lon,
        });
      }
    }
  }

  for device in &mut devices {
    let b = device.bounds;
    device.lat = rng.random_range(b.min_lat..=b.max_lat);
    device.lon = rng.random_range(b.min_lon..=b.max_lon);
  }

  let start = minutes_before(now, options.window_minutes)
    .ok_or_else(|| Error::InvalidSeedOptions("window starts before the earliest timestamp".into()))?;
  let points = options.points();
  let mut inserted = 0i64;

  let mut stmt = tx.prepare(
    "INSERT INTO readings (
       device_id, timestamp, lat, lon, location_accuracy,
       temp_c, humidity_rh, lux, uv_index, accel_x, accel_y, accel_z
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
  )?;

  for idx in 0..points {
    let timestamp = format_sqlite_ts(start + Duration::minutes(options.step_minutes * idx));
    let phase = idx as f64 / (points - 1).max(1) as f64 * TAU;

    for (d_i, device) in devices.iter_mut().enumerate() {
      device.walk(rng);
      let device_phase = phase + (d_i % 9) as f64 * DEVICE_PHASE_STEP;
      let r = device.reading(timestamp.clone(), device_phase);

      stmt.execute(rusqlite::params![
        r.device_id,
        r.timestamp,
        r.lat,
        r.lon,
        r.location_accuracy,
        r.temp_c,
        r.humidity_rh,
        r.lux,
        r.uv_index,
        r.accel_x,
        r.accel_y,
        r.accel_z,
      ])?;
      inserted += 1;
    }
  }

  Ok((devices.len() as i64, inserted))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn device() -> DemoDevice {
    let seed = AREA_SEEDS[0];
    DemoDevice {
      device_id:     "d_demo_kendallEastGateway_00".into(),
      bounds:        seed.bounds,
      temp_c_offset: seed.temp_c_offset,
      rh_offset:     seed.rh_offset,
      lat:           seed.bounds.max_lat,
      lon:           seed.bounds.min_lon,
    }
  }

  #[test]
  fn default_options_give_361_points() {
    assert_eq!(SeedOptions::default().points(), 361);
  }

  #[test]
  fn zero_step_is_rejected() {
    let opts = SeedOptions { step_minutes: 0, ..SeedOptions::default() };
    assert!(matches!(opts.validate(), Err(Error::InvalidSeedOptions(_))));
  }

  #[test]
  fn oversized_window_is_rejected() {
    for window_minutes in [MAX_WINDOW_MINUTES + 1, i64::MAX, -1] {
      let opts = SeedOptions { window_minutes, ..SeedOptions::default() };
      assert!(matches!(opts.validate(), Err(Error::InvalidSeedOptions(_))), "{window_minutes}");
    }
    let opts = SeedOptions { window_minutes: MAX_WINDOW_MINUTES, ..SeedOptions::default() };
    assert!(opts.validate().is_ok());
  }

  #[test]
  fn too_many_devices_is_rejected() {
    let opts = SeedOptions { devices_per_area: MAX_DEVICES_PER_AREA + 1, ..SeedOptions::default() };
    assert!(matches!(opts.validate(), Err(Error::InvalidSeedOptions(_))));
  }

  #[test]
  fn window_before_earliest_timestamp_is_rejected() {
    let mut conn = Connection::open_in_memory().unwrap();
    let schema = include_str!("../../../database/dr1_schema.sql");
    let options = SeedOptions::default();
    let err = seed_connection(
      &mut conn,
      schema,
      &options,
      &mut options.rng(),
      DateTime::<Utc>::MIN_UTC,
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidSeedOptions(_)));
    let devices: i64 = conn.query_row("SELECT COUNT(*) FROM devices", [], |r| r.get(0)).unwrap();
    assert_eq!(devices, 0);
  }

  #[test]
  fn walk_stays_inside_the_box() {
    let mut d = device();
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..10_000 {
      d.walk(&mut rng);
      assert!(d.bounds.contains(d.lat, d.lon));
    }
  }

  #[test]
  fn reading_at_phase_zero() {
    let r = device().reading("2025-01-01 00:00:00".into(), 0.0);
    // 26.5 + 1.2 offset, sin(0) = 0.
    assert_eq!(r.temp_c, 27.7);
    // 54 - 2.0 offset + 7 cos(0).
    assert_eq!(r.humidity_rh, 59.0);
    assert_eq!(r.lux, 140.0);
    assert_eq!(r.uv_index, 1.5);
    assert_eq!(r.accel_y, 0.02);
    assert_eq!(r.accel_z, 0.98);
    assert_eq!(r.location_accuracy, 10.0);
  }

  #[test]
  fn humidity_is_clamped() {
    let mut d = device();
    d.rh_offset = 60.0;
    assert_eq!(d.reading(String::new(), 0.0).humidity_rh, 95.0);
    d.rh_offset = -60.0;
    assert_eq!(d.reading(String::new(), 0.0).humidity_rh, 20.0);
  }
}
