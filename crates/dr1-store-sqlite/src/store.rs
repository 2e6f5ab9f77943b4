//! [`SqliteStore`], the SQLite implementation of [`SensorStore`].

use std::{io, path::PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use dr1_core::{
  heat::heat_index,
  reading::{
    AreaAggregate, AreaSeries, DeviceLocation, DeviceSeriesPoint, LuxSample, RhtSample,
  },
  store::{SeedOutcome, SensorStore},
  time::{format_sqlite_cutoff, hours_before, millis_before, minutes_before},
};

use crate::{
  Error, Layout, Result,
  encode::{RawAreaAggregate, RawBucket, RawLocation, RawSeriesPoint},
  error::into_call_error,
  samples,
  seed::{SeedOptions, seed_connection},
};

// ─── Schema source ───────────────────────────────────────────────────────────

#[derive(Clone)]
enum SchemaSource {
  /// Re-read from disk on every seeding pass.
  File(PathBuf),
  /// Compiled-in SQL, for in-memory stores.
  Inline(&'static str),
}

impl SchemaSource {
  async fn load(&self) -> Result<String> {
    match self {
      SchemaSource::File(path) => match tokio::fs::read_to_string(path).await {
        Ok(sql) => Ok(sql),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
          Err(Error::SchemaNotFound(path.clone()))
        }
        Err(e) => Err(e.into()),
      },
      SchemaSource::Inline(sql) => Ok((*sql).to_owned()),
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The demo reading database plus the two sample logs, each on its own
/// connection.
///
/// Cloning is cheap; the inner connections are reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:    tokio_rusqlite::Connection,
  lux:     tokio_rusqlite::Connection,
  rht:     tokio_rusqlite::Connection,
  schema:  SchemaSource,
  options: SeedOptions,
}

impl SqliteStore {
  /// Open the store described by `layout` and seed it.
  ///
  /// The database directory is created if needed. A missing schema file is
  /// reported before the database file is created.
  pub async fn open(layout: Layout, options: SeedOptions) -> Result<Self> {
    tokio::fs::create_dir_all(layout.database_dir()).await?;
    let schema = SchemaSource::File(layout.schema_path());
    let schema_sql = schema.load().await?;

    let store = Self {
      conn: tokio_rusqlite::Connection::open(layout.db_path()).await?,
      lux: tokio_rusqlite::Connection::open(layout.lux_log()).await?,
      rht: tokio_rusqlite::Connection::open(layout.rht_log()).await?,
      schema,
      options,
    };
    store.seed_with(schema_sql).await?;
    Ok(store)
  }

  /// Open an unseeded in-memory store that applies `schema_sql` when seeded;
  /// useful for testing.
  pub async fn open_in_memory(schema_sql: &'static str, options: SeedOptions) -> Result<Self> {
    Ok(Self {
      conn: tokio_rusqlite::Connection::open_in_memory().await?,
      lux: tokio_rusqlite::Connection::open_in_memory().await?,
      rht: tokio_rusqlite::Connection::open_in_memory().await?,
      schema: SchemaSource::Inline(schema_sql),
      options,
    })
  }

  async fn seed_with(&self, schema_sql: String) -> Result<SeedOutcome> {
    let options = self.options.clone();
    let outcome = self
      .conn
      .call(move |conn| {
        let mut rng = options.rng();
        seed_connection(conn, &schema_sql, &options, &mut rng, Utc::now())
          .map_err(into_call_error)
      })
      .await?;
    Ok(outcome)
  }
}

fn now_ms() -> i64 { Utc::now().timestamp_millis() }

// ─── SensorStore impl ────────────────────────────────────────────────────────

impl SensorStore for SqliteStore {
  type Error = Error;

  async fn ensure_seeded(&self) -> Result<SeedOutcome> {
    let schema_sql = self.schema.load().await?;
    self.seed_with(schema_sql).await
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn latest_locations(&self) -> Result<Vec<DeviceLocation>> {
    let raws: Vec<RawLocation> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT r.device_id, r.lat, r.lon, r.timestamp, r.temp_c, r.humidity_rh
           FROM readings r
           JOIN (
             SELECT device_id, MAX(timestamp) AS max_ts
             FROM readings
             GROUP BY device_id
           ) latest
             ON latest.device_id = r.device_id AND latest.max_ts = r.timestamp
           WHERE r.lat IS NOT NULL
             AND r.lon IS NOT NULL
             AND r.temp_c IS NOT NULL
             AND r.humidity_rh IS NOT NULL
           ORDER BY r.device_id ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawLocation {
              device_id:   row.get(0)?,
              lat:         row.get(1)?,
              lon:         row.get(2)?,
              timestamp:   row.get(3)?,
              temp_c:      row.get(4)?,
              humidity_rh: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawLocation::into_location).collect())
  }

  async fn device_series(&self, device_id: String, limit: u32) -> Result<Vec<DeviceSeriesPoint>> {
    let mut raws: Vec<RawSeriesPoint> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT timestamp, temp_c, humidity_rh
           FROM readings
           WHERE device_id = ?1
             AND temp_c IS NOT NULL
             AND humidity_rh IS NOT NULL
           ORDER BY timestamp DESC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![device_id, i64::from(limit)], |row| {
            Ok(RawSeriesPoint {
              timestamp:   row.get(0)?,
              temp_c:      row.get(1)?,
              humidity_rh: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // Newest-first out of SQL; charts want oldest-first.
    raws.reverse();
    Ok(raws.into_iter().map(RawSeriesPoint::into_point).collect())
  }

  async fn area_aggregates(
    &self,
    window_minutes: i64,
    now:            DateTime<Utc>,
  ) -> Result<Vec<AreaAggregate>> {
    let cutoff = minutes_before(now, window_minutes)
      .map(format_sqlite_cutoff)
      .ok_or(Error::OutOfRange("window_minutes"))?;

    let raws: Vec<RawAreaAggregate> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             a.area_id, a.name, a.min_lon, a.min_lat, a.max_lon, a.max_lat,
             COUNT(r.id)        AS n_readings,
             AVG(r.temp_c)      AS avg_temp_c,
             AVG(r.humidity_rh) AS avg_rh,
             MAX(r.timestamp)   AS max_ts
           FROM areas a
           LEFT JOIN readings r
             ON r.lat BETWEEN a.min_lat AND a.max_lat
            AND r.lon BETWEEN a.min_lon AND a.max_lon
            AND r.timestamp >= ?1
            AND r.temp_c IS NOT NULL
            AND r.humidity_rh IS NOT NULL
           GROUP BY a.area_id
           ORDER BY a.area_id ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![cutoff], |row| {
            Ok(RawAreaAggregate {
              area_id:    row.get(0)?,
              name:       row.get(1)?,
              min_lon:    row.get(2)?,
              min_lat:    row.get(3)?,
              max_lon:    row.get(4)?,
              max_lat:    row.get(5)?,
              n_readings: row.get(6)?,
              avg_temp_c: row.get(7)?,
              avg_rh:     row.get(8)?,
              max_ts:     row.get(9)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|raw| raw.into_aggregate(window_minutes))
      .collect()
  }

  async fn area_series(
    &self,
    area_id:        String,
    bucket_minutes: i64,
    hours:          i64,
    now:            DateTime<Utc>,
  ) -> Result<Option<AreaSeries>> {
    let bucket_minutes = bucket_minutes.max(1);
    let hours = hours.max(1);
    let bucket_seconds = bucket_minutes
      .checked_mul(60)
      .ok_or(Error::OutOfRange("bucket_minutes"))?;
    let cutoff = hours_before(now, hours)
      .map(format_sqlite_cutoff)
      .ok_or(Error::OutOfRange("hours"))?;

    let found = self
      .conn
      .call(move |conn| {
        let Some(area) = conn
          .query_row(
            "SELECT area_id, name, min_lon, min_lat, max_lon, max_lat
             FROM areas
             WHERE area_id = ?1",
            rusqlite::params![area_id],
            |row| {
              Ok(RawAreaAggregate {
                area_id:    row.get(0)?,
                name:       row.get(1)?,
                min_lon:    row.get(2)?,
                min_lat:    row.get(3)?,
                max_lon:    row.get(4)?,
                max_lat:    row.get(5)?,
                n_readings: None,
                avg_temp_c: None,
                avg_rh:     None,
                max_ts:     None,
              })
            },
          )
          .optional()?
        else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(
          "SELECT
             (CAST(strftime('%s', r.timestamp) AS INTEGER) / ?1) * ?1 AS bucket_s,
             COUNT(r.id)        AS n_readings,
             AVG(r.temp_c)      AS avg_temp_c,
             AVG(r.humidity_rh) AS avg_rh,
             MAX(r.timestamp)   AS max_ts
           FROM readings r
           WHERE r.timestamp >= ?2
             AND r.lat BETWEEN ?3 AND ?4
             AND r.lon BETWEEN ?5 AND ?6
             AND r.temp_c IS NOT NULL
             AND r.humidity_rh IS NOT NULL
           GROUP BY bucket_s
           ORDER BY bucket_s ASC",
        )?;
        let buckets = stmt
          .query_map(
            rusqlite::params![
              bucket_seconds,
              cutoff,
              area.min_lat,
              area.max_lat,
              area.min_lon,
              area.max_lon,
            ],
            |row| {
              Ok(RawBucket {
                bucket_s:   row.get(0)?,
                n_readings: row.get(1)?,
                avg_temp_c: row.get(2)?,
                avg_rh:     row.get(3)?,
                max_ts:     row.get(4)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((area, buckets)))
      })
      .await?;

    Ok(found.map(|(area, buckets)| AreaSeries {
      area_id: area.area_id,
      name: area.name,
      hours,
      bucket_minutes,
      series: buckets
        .into_iter()
        .map(|b| b.into_bucket(bucket_minutes))
        .collect(),
    }))
  }

  // ── Sample logs ───────────────────────────────────────────────────────────

  async fn log_lux(
    &self,
    lux:             f64,
    battery_voltage: f64,
    kerberos:        String,
  ) -> Result<LuxSample> {
    let sample = LuxSample { lux, battery_voltage, kerberos, ts: now_ms() };
    let row = sample.clone();
    self
      .lux
      .call(move |conn| {
        samples::insert_lux(conn, &row)?;
        Ok(())
      })
      .await?;
    Ok(sample)
  }

  async fn lux_history(&self, kerberos: String, minutes: i64) -> Result<Option<Vec<LuxSample>>> {
    let span = minutes
      .checked_mul(60 * 1000)
      .ok_or(Error::OutOfRange("time_minutes"))?;
    let since = millis_before(now_ms(), span);
    let rows = self
      .lux
      .call(move |conn| {
        if !samples::lux_table_exists(conn)? {
          return Ok(None);
        }
        Ok(Some(samples::select_lux(conn, &kerberos, since)?))
      })
      .await?;
    Ok(rows)
  }

  async fn log_rht(&self, rh: f64, t: f64, history_secs: Option<i64>) -> Result<Vec<RhtSample>> {
    let now = now_ms();
    let sample = RhtSample { rh, t, heat_index: heat_index(t, rh), ts: now };
    let since = match history_secs {
      Some(secs) => {
        let span = secs.checked_mul(1000).ok_or(Error::OutOfRange("history"))?;
        Some(millis_before(now, span))
      }
      None => None,
    };
    let rows = self
      .rht
      .call(move |conn| {
        samples::insert_rht(conn, &sample)?;
        Ok(samples::select_rht(conn, since)?)
      })
      .await?;
    Ok(rows)
  }
}
