//! Person — the base identity record shared by every role variant.
//!
//! A person owns its home address and (through [`Role`]) any specialization
//! payload. Shared reference data (terms, teams, houses, bunks, services,
//! vehicles) is referenced by identifier only.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result, age,
  role::{Role, RoleKind},
  validate::Checker,
};

// ─── Gender ──────────────────────────────────────────────────────────────────

/// Exactly one of the two enumerated values; encoded `"B"` / `"S"` on the
/// wire and in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
  #[serde(rename = "B")]
  Brother,
  #[serde(rename = "S")]
  Sister,
}

impl Gender {
  pub fn code(self) -> &'static str {
    match self {
      Self::Brother => "B",
      Self::Sister => "S",
    }
  }

  /// Parse a stored code. Anything outside `B`/`S` is a validation error.
  pub fn from_code(code: &str) -> Result<Self> {
    match code {
      "B" => Ok(Self::Brother),
      "S" => Ok(Self::Sister),
      other => {
        Err(Error::invalid_field("gender", format!("unknown gender code {other:?}")))
      }
    }
  }
}

// ─── Address ─────────────────────────────────────────────────────────────────

/// The person's home address — not their training residence. Owned by the
/// account; its lifetime is tied to the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  pub street:      String,
  /// City or locality.
  pub locality:    String,
  /// State, province, or region.
  pub region:      Option<String>,
  pub postal_code: Option<String>,
  pub country:     Option<String>,
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A persisted person record. `person_id` and `created_at` are assigned by
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:   Uuid,
  pub created_at:  DateTime<Utc>,
  pub given_name:  String,
  pub middle_name: Option<String>,
  pub nickname:    Option<String>,
  pub maiden_name: Option<String>,
  pub family_name: String,
  pub birthdate:   NaiveDate,
  pub gender:      Gender,
  pub married:     bool,
  pub address:     Address,
  /// At most one spouse; symmetry of the pairing is not enforced. Stale
  /// ids are resolved (or reported NotFound) at read time.
  pub spouse_id:   Option<Uuid>,
  pub role:        Role,
}

impl Person {
  /// The specialization this person currently holds, if any.
  pub fn role_kind(&self) -> Option<RoleKind> { self.role.kind() }

  /// Completed years of age as of `on`. Never stored; derived on read.
  pub fn age_on(&self, on: NaiveDate) -> Result<u32> {
    age::completed_years(self.birthdate, on)
  }

  /// Completed years of age as of today (UTC).
  pub fn age(&self) -> Result<u32> {
    self.age_on(Utc::now().date_naive())
  }

  /// Whether a service may be assigned to this person on `on`.
  ///
  /// Only short-term trainees and hospitality guests have an eligibility
  /// window; for every other role this is a computation error, not
  /// `false`, so callers cannot mistake "no window defined" for
  /// "departed".
  pub fn service_eligible_on(&self, on: NaiveDate) -> Result<bool> {
    match &self.role {
      Role::ShortTermTrainee(d) => {
        Ok(d.service_date <= on && on < d.departure_date)
      }
      Role::HospitalityGuest(d) => {
        Ok(self.created_at.date_naive() <= on && on < d.departure_date)
      }
      other => Err(Error::Computation {
        what:   "service eligibility",
        reason: format!(
          "no eligibility window is defined for role {:?}",
          other.discriminant()
        ),
      }),
    }
  }

  /// Term memberships, for the syllabus subsystem. Empty for non-trainees.
  pub fn term_ids(&self) -> &[Uuid] {
    match &self.role {
      Role::Trainee(d) => &d.terms,
      _ => &[],
    }
  }
}

// ─── NewPerson ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::RecordStore::add_person`] and
/// [`crate::store::RecordStore::update_person`]. Identity metadata is
/// always set by the store; it is not accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
  pub given_name:  String,
  #[serde(default)]
  pub middle_name: Option<String>,
  #[serde(default)]
  pub nickname:    Option<String>,
  #[serde(default)]
  pub maiden_name: Option<String>,
  pub family_name: String,
  pub birthdate:   NaiveDate,
  pub gender:      Gender,
  #[serde(default)]
  pub married:     bool,
  pub address:     Address,
  #[serde(default)]
  pub spouse_id:   Option<Uuid>,
  #[serde(default)]
  pub role:        Role,
}

impl NewPerson {
  /// Structural write-time validation. `person_id` is the id the record
  /// will be (or already is) stored under, so self-references can be
  /// rejected. Collects every violation rather than stopping at the
  /// first.
  ///
  /// Referential checks against reference data are the store's job; this
  /// only covers what the input alone can prove wrong.
  pub fn validate(&self, person_id: Uuid, today: NaiveDate) -> Result<()> {
    let mut check = Checker::new();

    check.require(
      !self.given_name.trim().is_empty(),
      "given_name",
      "must not be empty",
    );
    check.require(
      !self.family_name.trim().is_empty(),
      "family_name",
      "must not be empty",
    );
    check.require(
      self.birthdate < today,
      "birthdate",
      format!("must precede today ({today})"),
    );
    check.require(
      self.spouse_id != Some(person_id),
      "spouse_id",
      "a person cannot be their own spouse",
    );

    match &self.role {
      Role::None | Role::TrainingAssistant(_) => {}
      Role::Trainee(d) => {
        check.require(
          d.emergency_info.is_some(),
          "emergency_info",
          "required for trainees",
        );
        check.require(
          d.date_begin <= d.date_end,
          "date_begin",
          "must not follow date_end",
        );
        check.require(
          d.mentor_id != Some(person_id),
          "mentor_id",
          "a trainee cannot mentor themselves",
        );
      }
      Role::ShortTermTrainee(d) => {
        check.require(
          d.service_date < d.departure_date,
          "service_date",
          "must precede departure_date",
        );
      }
      Role::HospitalityGuest(_) => {}
    }

    check.finish()
  }
}
