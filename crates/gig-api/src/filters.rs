//! Handlers for the filter menus: `GET /freelancers/filters/{countries,skills}`.

use std::sync::Arc;

use axum::{Json, extract::State};
use gig_core::store::{DistinctField, FreelancerStore};

use crate::error::ApiError;

async fn distinct<S: FreelancerStore>(store: &S, field: DistinctField) -> Result<Json<Vec<String>>, ApiError> {
  let values = store.distinct(field).await.map_err(ApiError::from_store)?;
  Ok(Json(values))
}

/// `GET /freelancers/filters/countries`
pub async fn countries<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<String>>, ApiError>
where
  S: FreelancerStore,
{
  distinct(store.as_ref(), DistinctField::Country).await
}

/// `GET /freelancers/filters/skills`
pub async fn skills<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<String>>, ApiError>
where
  S: FreelancerStore,
{
  distinct(store.as_ref(), DistinctField::Skill).await
}
