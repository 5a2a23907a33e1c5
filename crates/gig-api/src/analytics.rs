//! Handler for `GET /freelancers/analytics`.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use gig_analytics::AnalyticsReport;
use gig_core::store::{FreelancerQuery, FreelancerStore};

use crate::error::ApiError;

/// `GET /freelancers/analytics`
///
/// Takes one snapshot of the whole store and evaluates every view against a
/// single `now`. An empty store yields zeroed and empty views, not an error.
pub async fn handler<S>(State(store): State<Arc<S>>) -> Result<Json<AnalyticsReport>, ApiError>
where
  S: FreelancerStore,
{
  let records = store
    .list(&FreelancerQuery::default())
    .await
    .map_err(ApiError::from_store)?;

  let report = AnalyticsReport::build(&records, Utc::now());
  tracing::debug!(
    total = report.activity_summary.total,
    inactive = report.activity_summary.inactive,
    "analytics report built"
  );
  Ok(Json(report))
}
