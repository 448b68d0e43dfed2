//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rollbook_core::validate::Violations;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// Write-time validation failure; carries every offending field.
  #[error("validation failed: {0}")]
  Validation(Violations),

  /// A derived value could not be computed from the stored record.
  #[error("unprocessable: {0}")]
  Unprocessable(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error by walking its source chain for a domain
  /// error. Validation and not-found failures keep their status codes no
  /// matter which backend produced them; everything else is a 500.
  pub fn from_store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    use rollbook_core::Error as Core;

    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(&err);
    while let Some(e) = current {
      if let Some(core) = e.downcast_ref::<Core>() {
        return match core {
          Core::Validation(v) => Self::Validation(v.clone()),
          Core::PersonNotFound(id) => {
            Self::NotFound(format!("person {id} not found"))
          }
          Core::ReferenceNotFound { entity, id } => {
            Self::NotFound(format!("{entity} {id} not found"))
          }
          Core::Computation { .. } => Self::Unprocessable(core.to_string()),
          Core::Serialization(_) => break,
        };
      }
      current = e.source();
    }

    Self::Store(Box::new(err))
  }
}

impl From<rollbook_core::Error> for ApiError {
  fn from(err: rollbook_core::Error) -> Self { Self::from_store(err) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match &self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Validation(violations) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        // One entry per offending field, never only the first.
        Json(json!({
          "error": "validation failed",
          "violations": violations.0,
        })),
      )
        .into_response(),
      ApiError::Unprocessable(m) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": m })),
      )
        .into_response(),
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response(),
    }
  }
}
