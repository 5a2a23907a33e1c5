//! JSON REST API for the gig freelancer roster.
//!
//! Exposes an axum [`Router`] backed by any [`gig_core::store::FreelancerStore`].
//! CORS, request tracing, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", gig_api::api_router(store.clone()))
//! ```

pub mod analytics;
pub mod error;
pub mod filters;
pub mod freelancers;
pub mod reactivate;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use chrono::{DateTime, Utc};
use gig_core::store::FreelancerStore;
use serde::{Deserialize, Serialize};

pub use error::ApiError;

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
  pub status:    String,
  pub timestamp: DateTime<Utc>,
  pub version:   String,
}

async fn health() -> Json<Health> {
  Json(Health {
    status:    "ok".to_owned(),
    timestamp: Utc::now(),
    version:   env!("CARGO_PKG_VERSION").to_owned(),
  })
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: FreelancerStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    // Static segments are matched before `{id}`.
    .route("/freelancers/analytics", get(analytics::handler::<S>))
    .route("/freelancers/reactivate", post(reactivate::handler::<S>))
    .route("/freelancers/filters/countries", get(filters::countries::<S>))
    .route("/freelancers/filters/skills", get(filters::skills::<S>))
    .route(
      "/freelancers",
      get(freelancers::list::<S>).post(freelancers::create::<S>),
    )
    .route(
      "/freelancers/{id}",
      get(freelancers::get_one::<S>)
        .put(freelancers::update::<S>)
        .delete(freelancers::delete::<S>),
    )
    .with_state(store)
}
