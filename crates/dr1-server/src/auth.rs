//! Admin sessions: password check, cookie-backed session tokens, and the
//! `/admin/login` and `/admin/logout` handlers.

use std::{
  collections::HashSet,
  sync::{Mutex, MutexGuard, PoisonError},
};

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{HeaderMap, header, request::Parts},
  response::{IntoResponse, Redirect},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dr1_core::store::SensorStore;
use rand_core::{OsRng, RngCore};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::Error};

pub const SESSION_COOKIE: &str = "admin_session";
/// Eight hours.
pub const SESSION_MAX_AGE_SECS: u64 = 8 * 60 * 60;

const TOKEN_BYTES: usize = 32;

// ─── Password ─────────────────────────────────────────────────────────────────

/// How the admin password is checked.
#[derive(Clone)]
pub struct AuthConfig {
  /// Plaintext fallback, used only when no hash is configured.
  pub password:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: Option<String>,
}

impl AuthConfig {
  pub fn verify(&self, candidate: &str) -> bool {
    match &self.password_hash {
      Some(hash) => PasswordHash::new(hash)
        .map(|parsed| {
          Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
        })
        .unwrap_or_else(|e| {
          tracing::warn!(error = %e, "admin_password_hash is not a valid PHC string");
          false
        }),
      None => candidate == self.password,
    }
  }
}

// ─── Sessions ─────────────────────────────────────────────────────────────────

/// The set of live admin session tokens. Lives as long as the process.
#[derive(Debug, Default)]
pub struct SessionStore {
  tokens: Mutex<HashSet<String>>,
}

impl SessionStore {
  fn tokens(&self) -> MutexGuard<'_, HashSet<String>> {
    self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Mint and remember a fresh token.
  pub fn create(&self) -> String {
    let token = new_token();
    self.tokens().insert(token.clone());
    token
  }

  pub fn contains(&self, token: &str) -> bool { self.tokens().contains(token) }

  /// Returns whether the token was live.
  pub fn revoke(&self, token: &str) -> bool { self.tokens().remove(token) }

  pub fn len(&self) -> usize { self.tokens().len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// 32 bytes from the OS RNG, URL-safe base64 without padding.
pub fn new_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  URL_SAFE_NO_PAD.encode(bytes)
}

/// The `admin_session` value from the request's `Cookie` headers, if any.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, _)| *name == SESSION_COOKIE)
    .map(|(_, value)| value)
    .filter(|value| !value.is_empty())
}

fn session_cookie(token: &str) -> String {
  format!(
    "{SESSION_COOKIE}={token}; HttpOnly; Max-Age={SESSION_MAX_AGE_SECS}; Path=/; SameSite=Lax"
  )
}

fn expired_cookie() -> String {
  format!(
    "{SESSION_COOKIE}=\"\"; expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; Path=/; SameSite=Lax"
  )
}

// ─── Extractor ────────────────────────────────────────────────────────────────

/// Present in a handler means the request carries a live admin session.
/// Otherwise the request is redirected to the landing page.
pub struct AdminSession;

impl<S> FromRequestParts<AppState<S>> for AdminSession
where
  S: SensorStore + Send + Sync + 'static,
{
  type Rejection = Redirect;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    match session_token(&parts.headers) {
      Some(token) if state.sessions.contains(token) => Ok(AdminSession),
      _ => Err(Redirect::to("/")),
    }
  }
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  #[serde(default)]
  pub password: String,
}

/// `POST /admin/login`, body: `{"password":"…"}`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, Error>
where
  S: SensorStore + Send + Sync + 'static,
{
  if !state.auth.verify(&body.password) {
    tracing::warn!("rejected admin login");
    return Err(Error::Unauthorized("Invalid admin password"));
  }
  let token = state.sessions.create();
  tracing::info!(sessions = state.sessions.len(), "admin logged in");
  Ok((
    [(header::SET_COOKIE, session_cookie(&token))],
    Json(json!({ "ok": true })),
  ))
}

/// `POST /admin/logout`
pub async fn logout<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> impl IntoResponse
where
  S: SensorStore + Send + Sync + 'static,
{
  if let Some(token) = session_token(&headers) {
    state.sessions.revoke(token);
  }
  (
    [(header::SET_COOKIE, expired_cookie())],
    Json(json!({ "ok": true })),
  )
}
