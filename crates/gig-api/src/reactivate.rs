//! Handler for `POST /freelancers/reactivate`.
//!
//! Re-engagement emails are mocked: each one is logged and reported as sent,
//! nothing leaves the process.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use gig_core::{freelancer::Freelancer, store::FreelancerStore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

pub const MOCK_NOTE: &str =
  "Emails are mocked: each one is logged by the server and never delivered.";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReactivateBody {
  pub freelancer_ids: Vec<String>,
}

/// Outcome of one mock email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailResult {
  pub freelancer_id: Uuid,
  pub name:          String,
  pub email:         String,
  /// Always `"sent"` for the mock sender.
  pub status:        String,
  pub message:       String,
  pub timestamp:     DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactivateResponse {
  pub emails_sent: usize,
  pub results:     Vec<EmailResult>,
  pub note:        String,
}

fn send_mock_email(f: &Freelancer, at: DateTime<Utc>) -> EmailResult {
  tracing::info!(
    freelancer_id = %f.id,
    email = %f.email,
    "mock re-engagement email sent"
  );
  EmailResult {
    freelancer_id: f.id,
    name:          f.name.clone(),
    email:         f.email.clone(),
    status:        "sent".to_owned(),
    message:       format!("Re-engagement email sent to {}", f.email),
    timestamp:     at,
  }
}

/// `POST /freelancers/reactivate`, body: `{"freelancerIds":["…"]}`
///
/// Unknown ids are skipped; the request only fails with 404 when none of
/// them match.
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<ReactivateBody>, JsonRejection>,
) -> Result<Json<ReactivateResponse>, ApiError>
where
  S: FreelancerStore,
{
  let Json(body) = body?;
  if body.freelancer_ids.is_empty() {
    return Err(ApiError::BadRequest(
      "Please provide an array of freelancer IDs".to_owned(),
    ));
  }

  let ids = body
    .freelancer_ids
    .iter()
    .map(|s| {
      Uuid::parse_str(s.trim())
        .map_err(|_| ApiError::BadRequest(format!("invalid freelancer id: {s}")))
    })
    .collect::<Result<Vec<_>, _>>()?;

  let freelancers = store.get_many(&ids).await.map_err(ApiError::from_store)?;
  if freelancers.is_empty() {
    return Err(ApiError::NotFound(
      "No freelancers found with provided IDs".to_owned(),
    ));
  }

  let now = Utc::now();
  let results: Vec<EmailResult> = freelancers.iter().map(|f| send_mock_email(f, now)).collect();

  Ok(Json(ReactivateResponse {
    emails_sent: results.len(),
    results,
    note: MOCK_NOTE.to_owned(),
  }))
}
