//! API error type and [`axum::response::IntoResponse`] implementation.

use std::error::Error as StdError;

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("validation failed: {}", .0.join("; "))]
  Validation(Vec<String>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn StdError + Send + Sync>),
}

impl ApiError {
  /// Classify a store error by the [`gig_core::Error`] in its source chain.
  ///
  /// Validation and uniqueness failures are the caller's fault; anything
  /// else is reported as an internal error.
  pub fn from_store<E>(e: E) -> Self
  where
    E: StdError + Send + Sync + 'static,
  {
    let mut current: Option<&(dyn StdError + 'static)> = Some(&e);
    while let Some(err) = current {
      if let Some(core) = err.downcast_ref::<gig_core::Error>() {
        match core {
          gig_core::Error::Validation(problems) => {
            return ApiError::Validation(problems.clone());
          }
          gig_core::Error::DuplicateEmail(_) => {
            return ApiError::BadRequest("Email already exists".to_owned());
          }
          gig_core::Error::UnknownGender(_) => break,
        }
      }
      current = err.source();
    }
    ApiError::Store(Box::new(e))
  }
}

// Extractor rejections get the same `{"error": ..}` body as handler errors.

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response(),
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Validation(details) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Validation Error", "details": details })),
      )
        .into_response(),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))).into_response()
      }
    }
  }
}
