//! Handlers for the lux and rht sample logs.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/heat_index2` | `?rh=<%>&t=<°F>[&history=<secs>]`, logs then reports |
//! | `POST` | `/lux_logger` | Form: `lux`, `bat`, `kerberos` |
//! | `GET`  | `/get_lux` | `?kerberos=<id>&time_minutes=<n>`, never writes |

use std::{fmt::Write as _, sync::Arc};

use axum::{
  Form, Json,
  extract::{Query, State},
};
use chrono::{DateTime, Local};
use dr1_core::{
  reading::{LuxSample, RhtSample},
  store::SensorStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── Rht ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RhtParams {
  pub rh:      f64,
  pub t:       f64,
  pub history: Option<i64>,
}

/// `GET /heat_index2?rh=<%>&t=<°F>[&history=<secs>]`
pub async fn heat_index2<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<RhtParams>,
) -> Result<Json<String>, ApiError>
where
  S: SensorStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if let Some(secs) = params.history {
    secs.checked_mul(1000).ok_or_else(|| ApiError::out_of_range("history"))?;
  }
  let samples = store
    .log_rht(params.rh, params.t, params.history)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rht_report(&samples)))
}

fn rht_report(samples: &[RhtSample]) -> String {
  samples.iter().fold(String::new(), |mut out, s| {
    let _ = write!(out, "rh: {:?} t: {:?} heat_index: {:?}!", s.rh, s.t, s.heat_index);
    out
  })
}

// ─── Lux ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LuxForm {
  #[serde(default)]
  pub lux:             f64,
  #[serde(default, rename = "bat")]
  pub battery_voltage: f64,
  #[serde(default)]
  pub kerberos:        String,
}

#[derive(Debug, Serialize)]
pub struct LuxLogged {
  pub status:          &'static str,
  pub lux:             f64,
  pub battery_voltage: f64,
  pub timestamp:       i64,
}

/// `POST /lux_logger`
pub async fn lux_logger<S>(
  State(store): State<Arc<S>>,
  Form(form): Form<LuxForm>,
) -> Result<Json<LuxLogged>, ApiError>
where
  S: SensorStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let sample = store
    .log_lux(form.lux, form.battery_voltage, form.kerberos)
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(kerberos = %sample.kerberos, lux = sample.lux, "lux sample logged");
  Ok(Json(LuxLogged {
    status:          "logged",
    lux:             sample.lux,
    battery_voltage: sample.battery_voltage,
    timestamp:       sample.ts,
  }))
}

#[derive(Debug, Deserialize)]
pub struct LuxQuery {
  pub kerberos:     String,
  pub time_minutes: i64,
}

/// `GET /get_lux?kerberos=<id>&time_minutes=<n>`
pub async fn get_lux<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<LuxQuery>,
) -> Result<Json<String>, ApiError>
where
  S: SensorStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  params
    .time_minutes
    .checked_mul(60 * 1000)
    .ok_or_else(|| ApiError::out_of_range("time_minutes"))?;
  let history = store
    .lux_history(params.kerberos.clone(), params.time_minutes)
    .await
    .map_err(ApiError::store)?;

  let report = match history {
    None => "No data found. Table does not exist yet.".to_owned(),
    Some(rows) if rows.is_empty() => format!(
      "No data found for kerberos '{}' in the last {} minutes.",
      params.kerberos, params.time_minutes
    ),
    Some(rows) => lux_report(&rows),
  };
  Ok(Json(report))
}

/// One line per sample, local wall-clock time first.
fn lux_report(rows: &[LuxSample]) -> String {
  let mut out = String::new();
  for row in rows {
    let readable = DateTime::from_timestamp_millis(row.ts)
      .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
      .unwrap_or_default();
    let _ = writeln!(
      out,
      "Time: {readable} ({}), Lux: {:?}, Battery Voltage: {:?}",
      row.ts, row.lux, row.battery_voltage
    );
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rht_report_concatenates_without_separator() {
    let samples = vec![
      RhtSample { rh: 50.0, t: 90.0, heat_index: 95.0, ts: 2 },
      RhtSample { rh: 40.0, t: 100.0, heat_index: 109.0, ts: 1 },
    ];
    assert_eq!(
      rht_report(&samples),
      "rh: 50.0 t: 90.0 heat_index: 95.0!rh: 40.0 t: 100.0 heat_index: 109.0!"
    );
  }

  #[test]
  fn lux_report_has_one_line_per_sample() {
    let rows = vec![LuxSample {
      lux:             321.5,
      battery_voltage: 3.7,
      kerberos:        "alice".into(),
      ts:              1_700_000_000_000,
    }];
    let report = lux_report(&rows);
    assert_eq!(report.lines().count(), 1);
    assert!(report.starts_with("Time: "));
    assert!(report.ends_with("(1700000000000), Lux: 321.5, Battery Voltage: 3.7\n"));
  }
}
