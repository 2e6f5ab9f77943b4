//! Liveness and stateless heat-index endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/health` | Always `"Im Up"` |
//! | `GET`  | `/heat_index` | `?t=<°F>&rh=<%>`, whole degrees |

use axum::{Json, extract::Query};
use dr1_core::heat::heat_index as compute;
use serde::Deserialize;

/// `GET /health`
pub async fn health() -> Json<&'static str> { Json("Im Up") }

#[derive(Debug, Deserialize)]
pub struct HeatParams {
  pub t:  f64,
  pub rh: f64,
}

/// `GET /heat_index?t=<°F>&rh=<%>`
pub async fn heat_index(Query(params): Query<HeatParams>) -> Json<i64> {
  Json(compute(params.t, params.rh) as i64)
}
