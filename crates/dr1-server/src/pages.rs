//! HTML pages served from the frontend directory.
//!
//! | Path | File |
//! |------|------|
//! | `/` | `landing.html` |
//! | `/dashboard` | `mockup.html` |
//! | `/about` | `about.html` |
//! | `/admin` | `admin.html`, admin session required |

use std::{io, path::Path};

use axum::{
  extract::State,
  http::header,
  response::{IntoResponse, Response},
};
use dr1_core::store::SensorStore;

use crate::{AppState, auth::AdminSession, error::Error};

async fn serve_page(dir: &Path, file: &str) -> Result<Response, Error> {
  match tokio::fs::read(dir.join(file)).await {
    Ok(bytes) => Ok(([(header::CONTENT_TYPE, "text/html; charset=utf-8")], bytes).into_response()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      Err(Error::NotFound(format!("{file} not found")))
    }
    Err(e) => Err(e.into()),
  }
}

/// `GET /`
pub async fn landing<S>(State(state): State<AppState<S>>) -> Result<Response, Error>
where
  S: SensorStore + Send + Sync + 'static,
{
  serve_page(&state.config.frontend_dir(), "landing.html").await
}

/// `GET /dashboard`
pub async fn dashboard<S>(State(state): State<AppState<S>>) -> Result<Response, Error>
where
  S: SensorStore + Send + Sync + 'static,
{
  serve_page(&state.config.frontend_dir(), "mockup.html").await
}

/// `GET /about`
pub async fn about<S>(State(state): State<AppState<S>>) -> Result<Response, Error>
where
  S: SensorStore + Send + Sync + 'static,
{
  serve_page(&state.config.frontend_dir(), "about.html").await
}

/// `GET /admin`; 303 to `/` without a session.
pub async fn admin<S>(
  _session: AdminSession,
  State(state): State<AppState<S>>,
) -> Result<Response, Error>
where
  S: SensorStore + Send + Sync + 'static,
{
  serve_page(&state.config.frontend_dir(), "admin.html").await
}
