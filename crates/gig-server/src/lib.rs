//! HTTP server wiring for the gig freelancer roster.
//!
//! Mounts [`gig_api::api_router`] under `/api` with request tracing and CORS,
//! and owns the server configuration and demo-data seeding.

pub mod seed;

use std::{path::{Path, PathBuf}, sync::Arc};

use axum::{
  Router,
  http::{HeaderValue, header::InvalidHeaderValue},
};
use gig_core::store::FreelancerStore;
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STORE_PATH: &str = "gig.db";

/// Runtime server configuration.
///
/// Layered as built-in defaults, then the optional TOML file, then `GIG_*`
/// environment variables (e.g. `GIG_PORT`, `GIG_STORE_PATH`).
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:        String,
  pub port:        u16,
  pub store_path:  PathBuf,
  /// Allowed browser origin; any origin when unset or `*`.
  #[serde(default)]
  pub cors_origin: Option<String>,
}

impl ServerConfig {
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", DEFAULT_HOST)?
      .set_default("port", i64::from(DEFAULT_PORT))?
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("GIG"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
  let allow = match origin.map(str::trim) {
    None | Some("") | Some("*") => AllowOrigin::from(Any),
    Some(origin) => AllowOrigin::exact(HeaderValue::from_str(origin)?),
  };
  Ok(CorsLayer::new().allow_origin(allow).allow_methods(Any).allow_headers(Any))
}

/// Build the full application: the API under `/api`, plus CORS and
/// per-request tracing.
pub fn app<S>(store: Arc<S>, cfg: &ServerConfig) -> Result<Router, InvalidHeaderValue>
where
  S: FreelancerStore + 'static,
{
  Ok(
    Router::new()
      .nest("/api", gig_api::api_router(store))
      .layer(cors_layer(cfg.cors_origin.as_deref())?)
      .layer(TraceLayer::new_for_http()),
  )
}
