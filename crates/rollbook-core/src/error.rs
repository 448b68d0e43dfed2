//! Error types for `rollbook-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::validate::Violations;

#[derive(Debug, Error)]
pub enum Error {
  /// One or more fields failed write-time validation. Every offending
  /// field is listed, not only the first one found.
  #[error("validation failed: {0}")]
  Validation(Violations),

  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  /// A reference-data lookup (term, team, house, bunk, service, vehicle)
  /// failed.
  #[error("{entity} not found: {id}")]
  ReferenceNotFound { entity: &'static str, id: Uuid },

  /// A derived value was requested on a record whose stored dates cannot
  /// support it (e.g. age with a future birthdate, eligibility on a role
  /// with no departure window).
  #[error("cannot compute {what}: {reason}")]
  Computation { what: &'static str, reason: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Shorthand for a single-field validation failure.
  pub fn invalid_field(
    field: impl Into<String>,
    message: impl Into<String>,
  ) -> Self {
    Self::Validation(Violations::single(field, message))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
