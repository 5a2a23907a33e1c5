//! Handlers for `/freelancers` CRUD endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/freelancers` | `?country`, `?skill`, `?search`, `?active`, `?page`, `?limit` |
//! | `POST`   | `/freelancers` | Body: [`NewFreelancer`]; returns 201 + stored record |
//! | `GET`    | `/freelancers/{id}` | Adds `performanceIndex`; 404 if not found |
//! | `PUT`    | `/freelancers/{id}` | Body: [`FreelancerPatch`]; 404 if not found |
//! | `DELETE` | `/freelancers/{id}` | 204; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use gig_analytics::{AnnotatedFreelancer, max_projects};
use gig_core::{
  freelancer::{Freelancer, FreelancerPatch, NewFreelancer},
  store::{FreelancerQuery, FreelancerStore, Page},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

pub const DEFAULT_PAGE_SIZE: usize = 50;

fn not_found(id: Uuid) -> ApiError { ApiError::NotFound(format!("freelancer {id} not found")) }

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub country: Option<String>,
  pub skill:   Option<String>,
  /// Case-insensitive substring over name and email.
  pub search:  Option<String>,
  /// Keep only active (`true`) or inactive (`false`) records of the page.
  pub active:  Option<bool>,
  /// 1-based; defaults to 1.
  pub page:    Option<usize>,
  pub limit:   Option<usize>,
}

/// `GET /freelancers[?country=..][&skill=..][&search=..][&active=..][&page=..][&limit=..]`
///
/// `active` is applied to the fetched page, after paging, so `count` may be
/// smaller than `limit` even when more pages follow.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Page<AnnotatedFreelancer>>, ApiError>
where
  S: FreelancerStore,
{
  let Query(params) = params?;
  let page  = params.page.unwrap_or(1).max(1);
  let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
  let query = FreelancerQuery {
    country: params.country,
    skill:   params.skill,
    search:  params.search,
    limit:   Some(limit),
    offset:  Some((page - 1).saturating_mul(limit)),
  };

  let records = store.list(&query).await.map_err(ApiError::from_store)?;
  let total = store.count(&query).await.map_err(ApiError::from_store)?;

  let now = Utc::now();
  let data: Vec<AnnotatedFreelancer> = records
    .into_iter()
    .map(|f| AnnotatedFreelancer::new(f, now))
    .filter(|a| params.active.is_none_or(|want| a.is_active == want))
    .collect();

  Ok(Json(Page {
    count: data.len(),
    total,
    total_pages: total.div_ceil(limit),
    current_page: page,
    data,
  }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /freelancers`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewFreelancer>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FreelancerStore,
{
  let Json(body) = body?;
  let freelancer = store.create(body).await.map_err(ApiError::from_store)?;
  tracing::info!(id = %freelancer.id, "freelancer created");
  Ok((StatusCode::CREATED, Json(freelancer)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /freelancers/{id}`
///
/// The performance index is scored against the largest project count in the
/// whole store, not just this record.
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<AnnotatedFreelancer>, ApiError>
where
  S: FreelancerStore,
{
  let Path(id) = id?;
  let freelancer = store
    .get(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| not_found(id))?;

  let everyone = store
    .list(&FreelancerQuery::default())
    .await
    .map_err(ApiError::from_store)?;

  Ok(Json(AnnotatedFreelancer::scored(freelancer, max_projects(&everyone), Utc::now())))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /freelancers/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<Uuid>, PathRejection>,
  patch: Result<Json<FreelancerPatch>, JsonRejection>,
) -> Result<Json<Freelancer>, ApiError>
where
  S: FreelancerStore,
{
  let (Path(id), Json(patch)) = (id?, patch?);
  let freelancer = store
    .update(id, patch)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(freelancer))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /freelancers/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
  S: FreelancerStore,
{
  let Path(id) = id?;
  if store.delete(id).await.map_err(ApiError::from_store)? {
    tracing::info!(%id, "freelancer deleted");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(not_found(id))
  }
}
