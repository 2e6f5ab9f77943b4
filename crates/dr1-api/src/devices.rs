//! Handlers for per-device DR1 endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/dr1/locations` | Latest reading per device |
//! | `GET`  | `/api/dr1/devices/{device_id}/series` | `?limit=180`, oldest first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use dr1_core::{
  reading::{DeviceLocation, DeviceSeriesPoint},
  store::SensorStore,
};
use serde::Deserialize;

use crate::{error::ApiError, seeded};

// ─── Locations ────────────────────────────────────────────────────────────────

/// `GET /api/dr1/locations`
pub async fn locations<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<DeviceLocation>>, ApiError>
where
  S: SensorStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  seeded(store.as_ref()).await?;
  let locations = store.latest_locations().await.map_err(ApiError::store)?;
  Ok(Json(locations))
}

// ─── Series ───────────────────────────────────────────────────────────────────

fn default_limit() -> u32 { 180 }

#[derive(Debug, Deserialize)]
pub struct SeriesParams {
  #[serde(default = "default_limit")]
  pub limit: u32,
}

/// `GET /api/dr1/devices/{device_id}/series[?limit=<n>]`
///
/// An unknown device yields an empty list rather than a 404.
pub async fn series<S>(
  State(store): State<Arc<S>>,
  Path(device_id): Path<String>,
  Query(params): Query<SeriesParams>,
) -> Result<Json<Vec<DeviceSeriesPoint>>, ApiError>
where
  S: SensorStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  seeded(store.as_ref()).await?;
  let points = store
    .device_series(device_id, params.limit)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(points))
}
