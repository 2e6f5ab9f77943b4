//! Handlers for area and campus DR1 endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/dr1/areas` | `?window_minutes=10` |
//! | `GET`  | `/api/dr1/areas/{area_id}/series` | `?bucket_minutes=5&hours=3`, 404 if unknown |
//! | `GET`  | `/api/dr1/campus/summary` | `?window_minutes=10` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use dr1_core::{
  reading::{AreaAggregate, AreaSeries},
  store::SensorStore,
  summary::{CampusSummary, campus_summary},
  time::{hours_before, minutes_before},
};
use serde::Deserialize;

use crate::{error::ApiError, seeded};

fn default_window() -> i64 { 10 }
fn default_bucket() -> i64 { 5 }
fn default_hours() -> i64 { 3 }

fn check_window(now: DateTime<Utc>, window_minutes: i64) -> Result<(), ApiError> {
  minutes_before(now, window_minutes)
    .map(drop)
    .ok_or_else(|| ApiError::out_of_range("window_minutes"))
}

#[derive(Debug, Deserialize)]
pub struct WindowParams {
  #[serde(default = "default_window")]
  pub window_minutes: i64,
}

// ─── Aggregates ───────────────────────────────────────────────────────────────

/// `GET /api/dr1/areas[?window_minutes=<n>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<WindowParams>,
) -> Result<Json<Vec<AreaAggregate>>, ApiError>
where
  S: SensorStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let now = Utc::now();
  check_window(now, params.window_minutes)?;
  seeded(store.as_ref()).await?;
  let areas = store
    .area_aggregates(params.window_minutes, now)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(areas))
}

// ─── Series ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SeriesParams {
  #[serde(default = "default_bucket")]
  pub bucket_minutes: i64,
  #[serde(default = "default_hours")]
  pub hours:          i64,
}

/// `GET /api/dr1/areas/{area_id}/series[?bucket_minutes=<n>&hours=<n>]`
pub async fn series<S>(
  State(store): State<Arc<S>>,
  Path(area_id): Path<String>,
  Query(params): Query<SeriesParams>,
) -> Result<Json<AreaSeries>, ApiError>
where
  S: SensorStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let now = Utc::now();
  params
    .bucket_minutes
    .max(1)
    .checked_mul(60)
    .ok_or_else(|| ApiError::out_of_range("bucket_minutes"))?;
  hours_before(now, params.hours.max(1)).ok_or_else(|| ApiError::out_of_range("hours"))?;

  seeded(store.as_ref()).await?;
  store
    .area_series(area_id, params.bucket_minutes, params.hours, now)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound("Unknown area_id".into()))
}

// ─── Campus ───────────────────────────────────────────────────────────────────

/// `GET /api/dr1/campus/summary[?window_minutes=<n>]`
pub async fn summary<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<WindowParams>,
) -> Result<Json<CampusSummary>, ApiError>
where
  S: SensorStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let now = Utc::now();
  check_window(now, params.window_minutes)?;
  seeded(store.as_ref()).await?;
  let areas = store
    .area_aggregates(params.window_minutes, now)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(campus_summary(&areas, params.window_minutes)))
}
