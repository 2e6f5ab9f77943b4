//! HTTP server for the DR1 sensor demo.
//!
//! Wraps the JSON API from [`dr1_api`] with the static HTML pages, the
//! `/assets` directory, and cookie-based admin sessions.

pub mod auth;
pub mod error;
pub mod pages;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use dr1_core::store::SensorStore;
use dr1_store_sqlite::{Layout, SeedOptions};
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};

use auth::{AuthConfig, SessionStore};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and `DR1_*`
/// environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  /// Storage root; holds `database/` and, by default, the sample logs.
  pub root:                PathBuf,
  /// Defaults to `<root>/frontend`.
  pub frontend_dir:        Option<PathBuf>,
  pub lux_log:             Option<PathBuf>,
  pub rht_log:             Option<PathBuf>,
  pub admin_password:      String,
  /// Argon2 PHC string; replaces `admin_password` when set.
  pub admin_password_hash: Option<String>,
  pub seed:                SeedOptions,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "127.0.0.1".to_string(),
      port:                8000,
      root:                PathBuf::from("."),
      frontend_dir:        None,
      lux_log:             None,
      rht_log:             None,
      admin_password:      "monotream".to_string(),
      admin_password_hash: None,
      seed:                SeedOptions::default(),
    }
  }
}

impl ServerConfig {
  pub fn frontend_dir(&self) -> PathBuf {
    self
      .frontend_dir
      .clone()
      .unwrap_or_else(|| self.root.join("frontend"))
  }

  pub fn assets_dir(&self) -> PathBuf { self.frontend_dir().join("assets") }

  pub fn layout(&self) -> Layout {
    let layout = Layout::new(self.root.clone());
    let lux = self.lux_log.clone().unwrap_or_else(|| layout.lux_log().to_path_buf());
    let rht = self.rht_log.clone().unwrap_or_else(|| layout.rht_log().to_path_buf());
    layout.with_sample_logs(lux, rht)
  }

  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      password:      self.admin_password.clone(),
      password_hash: self.admin_password_hash.clone(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:    Arc<S>,
  pub sessions: Arc<SessionStore>,
  pub config:   Arc<ServerConfig>,
  pub auth:     Arc<AuthConfig>,
}

impl<S> AppState<S> {
  pub fn new(store: Arc<S>, config: ServerConfig) -> Self {
    Self {
      store,
      sessions: Arc::new(SessionStore::default()),
      auth: Arc::new(config.auth()),
      config: Arc::new(config),
    }
  }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      sessions: self.sessions.clone(),
      config:   self.config.clone(),
      auth:     self.auth.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application [`Router`]: pages, admin, API and assets.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: SensorStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let api    = dr1_api::api_router(state.store.clone());
  let assets = ServeDir::new(state.config.assets_dir());

  Router::new()
    .route("/",             get(pages::landing::<S>))
    .route("/dashboard",    get(pages::dashboard::<S>))
    .route("/about",        get(pages::about::<S>))
    .route("/admin",        get(pages::admin::<S>))
    .route("/admin/login",  post(auth::login::<S>))
    .route("/admin/logout", post(auth::logout::<S>))
    .with_state(state)
    .merge(api)
    .nest_service("/assets", assets)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use std::{fs, path::Path};

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use dr1_store_sqlite::SqliteStore;
  use serde_json::Value;
  use tower::ServiceExt as _;
  use uuid::Uuid;

  const SCHEMA: &str = include_str!("../../../database/dr1_schema.sql");

  fn scratch_frontend() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dr1-server-{}", Uuid::new_v4()));
    fs::create_dir_all(dir.join("assets")).unwrap();
    fs::write(dir.join("landing.html"), "<h1>landing</h1>").unwrap();
    fs::write(dir.join("admin.html"), "<h1>admin</h1>").unwrap();
    fs::write(dir.join("assets").join("app.js"), "console.log(1);").unwrap();
    dir
  }

  async fn make_state(frontend: &Path) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory(SCHEMA, SeedOptions::default())
      .await
      .unwrap();
    AppState::new(Arc::new(store), ServerConfig {
      frontend_dir: Some(frontend.to_path_buf()),
      admin_password: "secret".to_string(),
      ..ServerConfig::default()
    })
  }

  async fn oneshot_raw(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, &str)>,
    body:    &str,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn body_text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  async fn login(state: AppState<SqliteStore>, password: &str) -> Response {
    let body = serde_json::json!({ "password": password }).to_string();
    oneshot_raw(
      state,
      "POST",
      "/admin/login",
      vec![(header::CONTENT_TYPE, "application/json")],
      &body,
    ).await
  }

  fn cookie_pair(resp: &Response) -> String {
    let set_cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
  }

  // ── Pages ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn landing_page_is_served() {
    let dir   = scratch_frontend();
    let state = make_state(&dir).await;
    let resp  = oneshot_raw(state, "GET", "/", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
    assert!(ct.starts_with("text/html"), "content-type: {ct}");
    assert_eq!(body_text(resp).await, "<h1>landing</h1>");
  }

  #[tokio::test]
  async fn missing_page_is_404_with_detail() {
    let dir   = scratch_frontend();
    let state = make_state(&dir).await;
    let resp  = oneshot_raw(state, "GET", "/dashboard", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["detail"], "mockup.html not found");
  }

  #[tokio::test]
  async fn assets_are_served() {
    let dir   = scratch_frontend();
    let state = make_state(&dir).await;
    let resp  = oneshot_raw(state, "GET", "/assets/app.js", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "console.log(1);");
  }

  #[tokio::test]
  async fn api_routes_are_mounted() {
    let dir   = scratch_frontend();
    let state = make_state(&dir).await;
    let resp  = oneshot_raw(state, "GET", "/health", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "\"Im Up\"");
  }

  // ── Admin ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_without_session_redirects() {
    let dir   = scratch_frontend();
    let state = make_state(&dir).await;
    let resp  = oneshot_raw(state, "GET", "/admin", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
  }

  #[tokio::test]
  async fn admin_with_unknown_token_redirects() {
    let dir   = scratch_frontend();
    let state = make_state(&dir).await;
    let resp  = oneshot_raw(
      state,
      "GET",
      "/admin",
      vec![(header::COOKIE, "admin_session=forged")],
      "",
    ).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  }

  #[tokio::test]
  async fn wrong_password_is_401() {
    let dir   = scratch_frontend();
    let state = make_state(&dir).await;
    let resp  = login(state.clone(), "nope").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["detail"], "Invalid admin password");
    assert!(state.sessions.is_empty());
  }

  #[tokio::test]
  async fn login_then_admin_then_logout() {
    let dir   = scratch_frontend();
    let state = make_state(&dir).await;

    let resp = login(state.clone(), "secret").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = cookie_pair(&resp);
    assert!(cookie.starts_with("admin_session="));
    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["ok"], true);

    let resp = oneshot_raw(
      state.clone(), "GET", "/admin", vec![(header::COOKIE, cookie.as_str())], "",
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "<h1>admin</h1>");

    let resp = oneshot_raw(
      state.clone(), "POST", "/admin/logout", vec![(header::COOKIE, cookie.as_str())], "",
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let expired = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(expired.contains("Max-Age=0"), "set-cookie: {expired}");
    assert!(state.sessions.is_empty());

    let resp = oneshot_raw(
      state, "GET", "/admin", vec![(header::COOKIE, cookie.as_str())], "",
    ).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  }

  #[tokio::test]
  async fn logout_without_session_is_ok() {
    let dir   = scratch_frontend();
    let state = make_state(&dir).await;
    let resp  = oneshot_raw(state, "POST", "/admin/logout", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  // ── Configuration ───────────────────────────────────────────────────────────

  #[test]
  fn config_defaults_apply_to_missing_fields() {
    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str(
        "port = 9000\n[seed]\nseed = 7\n",
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.admin_password, "monotream");
    assert_eq!(cfg.seed.seed, 7);
    assert_eq!(cfg.seed.min_devices, 30);
    assert_eq!(cfg.frontend_dir(), PathBuf::from("./frontend"));
  }

  #[test]
  fn sample_logs_default_under_root() {
    let cfg = ServerConfig {
      root: PathBuf::from("/srv/dr1"),
      rht_log: Some(PathBuf::from("/var/rht.db")),
      ..ServerConfig::default()
    };
    let layout = cfg.layout();
    assert_eq!(layout.lux_log(), Path::new("/srv/dr1/lux_log.db"));
    assert_eq!(layout.rht_log(), Path::new("/var/rht.db"));
    assert_eq!(layout.db_path(), PathBuf::from("/srv/dr1/database/dr1_demo.db"));
  }
}
