//! The `FreelancerStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `gig-store-sqlite`).
//! Higher layers (`gig-api`, `gig-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::freelancer::{Freelancer, FreelancerPatch, NewFreelancer};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`FreelancerStore::list`] and [`FreelancerStore::count`].
#[derive(Debug, Clone, Default)]
pub struct FreelancerQuery {
  /// Exact match on country.
  pub country: Option<String>,
  /// Exact match on skill.
  pub skill:   Option<String>,
  /// Case-insensitive substring match over name and email.
  pub search:  Option<String>,
  pub limit:   Option<usize>,
  pub offset:  Option<usize>,
}

/// A column whose distinct values can be listed for filter menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctField {
  Country,
  Skill,
}

/// One page of a listing, as returned by `GET /freelancers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  /// Number of items in `data`.
  pub count:        usize,
  /// Number of records matching the query across all pages.
  pub total:        usize,
  pub total_pages:  usize,
  pub current_page: usize,
  pub data:         Vec<T>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a freelancer record store.
///
/// Implementations normalize and validate input via
/// [`NewFreelancer::into_freelancer`] and [`Freelancer::patched`], and enforce
/// email uniqueness. Validation and uniqueness failures must be reachable
/// through the returned error's `source()` chain as a [`crate::Error`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait FreelancerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Validate and persist a new record.
  fn create(
    &self,
    input: NewFreelancer,
  ) -> impl Future<Output = Result<Freelancer, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Freelancer>, Self::Error>> + Send + '_;

  /// Retrieve every record whose id is in `ids`; unknown ids are skipped.
  fn get_many<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Freelancer>, Self::Error>> + Send + 'a;

  /// Apply a partial update. Returns `None` if the record does not exist.
  fn update(
    &self,
    id: Uuid,
    patch: FreelancerPatch,
  ) -> impl Future<Output = Result<Option<Freelancer>, Self::Error>> + Send + '_;

  /// Delete a record. Returns `false` if it did not exist.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete every record and return how many were removed.
  fn delete_all(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Records matching `query`, most recently active first.
  fn list<'a>(
    &'a self,
    query: &'a FreelancerQuery,
  ) -> impl Future<Output = Result<Vec<Freelancer>, Self::Error>> + Send + 'a;

  /// Number of records matching `query`; `limit` and `offset` are ignored.
  fn count<'a>(
    &'a self,
    query: &'a FreelancerQuery,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Sorted distinct values of `field`.
  fn distinct(
    &self,
    field: DistinctField,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;
}
