//! Lux and rht sample logs: two independent flat tables, each in its own
//! SQLite file.

use dr1_core::reading::{LuxSample, RhtSample};
use rusqlite::{Connection, OptionalExtension as _};

use crate::schema::{LUX_TABLE, RHT_TABLE};

// ─── Lux ─────────────────────────────────────────────────────────────────────

pub fn insert_lux(conn: &Connection, sample: &LuxSample) -> rusqlite::Result<()> {
  conn.execute_batch(LUX_TABLE)?;
  conn.execute(
    "INSERT INTO lux_table (lux, battery_voltage, kerberos, ts) VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![sample.lux, sample.battery_voltage, sample.kerberos, sample.ts],
  )?;
  Ok(())
}

/// Whether anything has ever been logged. Never creates the table.
pub fn lux_table_exists(conn: &Connection) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'lux_table'",
        [],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

pub fn select_lux(
  conn:     &Connection,
  kerberos: &str,
  since_ms: i64,
) -> rusqlite::Result<Vec<LuxSample>> {
  let mut stmt = conn.prepare(
    "SELECT lux, battery_voltage, kerberos, ts
     FROM lux_table
     WHERE ts >= ?1 AND kerberos = ?2
     ORDER BY ts DESC, rowid DESC",
  )?;
  stmt
    .query_map(rusqlite::params![since_ms, kerberos], |row| {
      Ok(LuxSample {
        lux:             row.get(0)?,
        battery_voltage: row.get(1)?,
        kerberos:        row.get(2)?,
        ts:              row.get(3)?,
      })
    })?
    .collect()
}

// ─── RHT ─────────────────────────────────────────────────────────────────────

pub fn insert_rht(conn: &Connection, sample: &RhtSample) -> rusqlite::Result<()> {
  conn.execute_batch(RHT_TABLE)?;
  conn.execute(
    "INSERT INTO rht_table (rh, t, heat_index, ts) VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![sample.rh, sample.t, sample.heat_index, sample.ts],
  )?;
  Ok(())
}

/// Samples newer than `since_ms` (all of them when `None`), newest first.
pub fn select_rht(conn: &Connection, since_ms: Option<i64>) -> rusqlite::Result<Vec<RhtSample>> {
  let mut stmt = conn.prepare(
    "SELECT rh, t, heat_index, ts
     FROM rht_table
     WHERE ?1 IS NULL OR ts >= ?1
     ORDER BY ts DESC, rowid DESC",
  )?;
  stmt
    .query_map(rusqlite::params![since_ms], |row| {
      Ok(RhtSample {
        rh:         row.get(0)?,
        t:          row.get(1)?,
        heat_index: row.get(2)?,
        ts:         row.get(3)?,
      })
    })?
    .collect()
}
