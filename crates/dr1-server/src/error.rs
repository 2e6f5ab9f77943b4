//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized: {0}")]
  Unauthorized(&'static str),
  #[error("not found: {0}")]
  NotFound(String),
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, detail) = match self {
      Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.to_owned()),
      Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
      Error::Io(e) => {
        tracing::error!(error = %e, "io error");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "detail": detail }))).into_response()
  }
}
