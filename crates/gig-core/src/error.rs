//! Error types for `gig-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// One message per rejected field, in field order.
  #[error("validation failed: {}", .0.join("; "))]
  Validation(Vec<String>),

  #[error("email already exists: {0}")]
  DuplicateEmail(String),

  #[error("unknown gender: {0:?}")]
  UnknownGender(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
