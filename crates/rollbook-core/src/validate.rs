//! Field-level validation support.
//!
//! Write-time validation collects every offending field before failing, so
//! an administrative form can surface all problems in one round trip. A
//! [`Violations`] list is carried inside
//! [`Error::Validation`](crate::Error::Validation).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single field that failed validation, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
  pub field:   String,
  pub message: String,
}

impl Violation {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self { field: field.into(), message: message.into() }
  }
}

impl fmt::Display for Violation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.field, self.message)
  }
}

/// A non-empty list of [`Violation`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
  pub fn single(
    field: impl Into<String>,
    message: impl Into<String>,
  ) -> Self {
    Self(vec![Violation::new(field, message)])
  }

  pub fn iter(&self) -> impl Iterator<Item = &Violation> { self.0.iter() }
}

impl fmt::Display for Violations {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for v in &self.0 {
      if !first {
        write!(f, "; ")?;
      }
      write!(f, "{v}")?;
      first = false;
    }
    Ok(())
  }
}

/// Accumulates violations during a write-time check and converts to a
/// `Result` only at the end, so later checks still run after a failure.
#[derive(Debug, Default)]
pub struct Checker {
  violations: Vec<Violation>,
}

impl Checker {
  pub fn new() -> Self { Self::default() }

  pub fn fail(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.violations.push(Violation::new(field, message));
  }

  pub fn require(
    &mut self,
    ok: bool,
    field: impl Into<String>,
    message: impl Into<String>,
  ) {
    if !ok {
      self.fail(field, message);
    }
  }

  pub fn is_clean(&self) -> bool { self.violations.is_empty() }

  /// `Ok(())` if nothing failed, otherwise every collected violation.
  pub fn finish(self) -> crate::Result<()> {
    if self.violations.is_empty() {
      Ok(())
    } else {
      Err(crate::Error::Validation(Violations(self.violations)))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clean_checker_finishes_ok() {
    let mut c = Checker::new();
    c.require(true, "birthdate", "must precede today");
    assert!(c.is_clean());
    assert!(c.finish().is_ok());
  }

  #[test]
  fn checker_collects_every_violation() {
    let mut c = Checker::new();
    c.fail("birthdate", "must precede today");
    c.require(false, "date_begin", "must not follow date_end");
    c.fail("mentor_id", "a trainee cannot mentor themselves");

    let err = c.finish().unwrap_err();
    match err {
      crate::Error::Validation(violations) => {
        let fields: Vec<_> =
          violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["birthdate", "date_begin", "mentor_id"]);
      }
      other => panic!("expected Validation, got {other:?}"),
    }
  }

  #[test]
  fn display_lists_all_fields() {
    let v = Violations(vec![
      Violation::new("gender", "unknown gender code"),
      Violation::new("team_id", "unknown team"),
    ]);
    let text = v.to_string();
    assert!(text.contains("gender"), "{text}");
    assert!(text.contains("team_id"), "{text}");
  }
}
