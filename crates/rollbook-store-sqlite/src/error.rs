//! Error type for `rollbook-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Validation, not-found, and computation errors from the domain layer.
  /// Kept as a wrapped source so callers can classify without depending
  /// on this crate.
  #[error("core error: {0}")]
  Core(#[from] rollbook_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  /// Whether this error carries field-level validation violations.
  pub fn is_validation(&self) -> bool {
    matches!(self, Self::Core(rollbook_core::Error::Validation(_)))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
