//! JSON API for the DR1 sensor demo.
//!
//! Exposes an axum [`Router`] backed by any [`dr1_core::store::SensorStore`].
//! Pages, admin sessions and static assets are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(dr1_api::api_router(store.clone()))
//! ```

pub mod areas;
pub mod devices;
pub mod error;
pub mod heat;
pub mod samples;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use dr1_core::store::SensorStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: SensorStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Utility
    .route("/health", get(heat::health))
    .route("/heat_index", get(heat::heat_index))
    // Sample logs
    .route("/heat_index2", get(samples::heat_index2::<S>))
    .route("/lux_logger", post(samples::lux_logger::<S>))
    .route("/get_lux", get(samples::get_lux::<S>))
    // DR1
    .route("/api/dr1/locations", get(devices::locations::<S>))
    .route("/api/dr1/devices/{device_id}/series", get(devices::series::<S>))
    .route("/api/dr1/areas", get(areas::list::<S>))
    .route("/api/dr1/areas/{area_id}/series", get(areas::series::<S>))
    .route("/api/dr1/campus/summary", get(areas::summary::<S>))
    .with_state(store)
}

/// Every DR1 read starts by making sure the demo dataset exists.
pub(crate) async fn seeded<S>(store: &S) -> Result<(), ApiError>
where
  S: SensorStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let outcome = store.ensure_seeded().await.map_err(ApiError::store)?;
  if outcome.regenerated() {
    tracing::info!(?outcome, "demo dataset regenerated");
  }
  Ok(())
}
