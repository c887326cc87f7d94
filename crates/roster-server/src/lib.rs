//! HTTP server wiring for Roster.
//!
//! Mounts the [`roster_api`] router under `/api` and wraps it in tracing and
//! request-timeout layers.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::Router;
use roster_core::{service::PeopleService, store::PeopleStore};
use serde::Deserialize;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  /// Requests still running after this many seconds are cancelled.
  pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "127.0.0.1".into(),
      port:                 8080,
      store_path:           PathBuf::from("roster.db"),
      request_timeout_secs: 30,
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `ROSTER_*` environment
  /// variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("ROSTER"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `service`.
pub fn router<S>(service: Arc<PeopleService<S>>, config: &ServerConfig) -> Router
where
  S: PeopleStore + 'static,
{
  Router::new()
    .nest("/api", roster_api::api_router(service))
    .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
    .layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
