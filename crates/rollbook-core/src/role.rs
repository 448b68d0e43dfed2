//! Role specializations — the tagged variant a person record carries.
//!
//! The original data model expressed Trainee / TrainingAssistant /
//! ShortTermTrainee / HospitalityGuest as separate extensions of the base
//! account. Here they are a single tagged `Role` on [`Person`], which makes
//! holding two specializations at once structurally impossible.
//!
//! [`Person`]: crate::person::Person

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Role kinds ──────────────────────────────────────────────────────────────

/// The specialization discriminant, without its payload. Used for store
/// columns and roster filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
  Trainee,
  TrainingAssistant,
  ShortTermTrainee,
  HospitalityGuest,
}

// ─── Payloads ────────────────────────────────────────────────────────────────

/// Emergency contact, created alongside a trainee and owned by the record.
/// Required one-to-one: a trainee without one fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyInfo {
  pub contact_name:    String,
  /// Relation to the trainee, e.g. "mother" or "spouse".
  pub relationship:    String,
  pub phone:           String,
  pub alternate_phone: Option<String>,
  pub address:         Option<String>,
}

/// The enrollment category of a trainee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraineeKind {
  /// A regular full-time trainee.
  Regular,
  /// A "short-term" long-term trainee.
  ShortTerm,
  Commuter,
}

/// A full-time trainee's assignments.
///
/// `terms` and `services` reference shared reference data and are checked
/// for existence at write time. `mentor_id`, `supervisor_id`, and the
/// person-level `spouse_id` are plain identifiers resolved at read time;
/// a stale one reports NotFound instead of dangling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraineeData {
  /// Terms the trainee has gone through; a trainee can span several.
  pub terms:           Vec<Uuid>,
  pub kind:            TraineeKind,
  /// Always `Some` on persisted records; `None` is rejected at write time.
  pub emergency_info:  Option<EmergencyInfo>,
  pub date_begin:      NaiveDate,
  pub date_end:        NaiveDate,
  pub degree:          String,
  /// Another trainee; must not be the trainee themselves.
  pub mentor_id:       Option<Uuid>,
  pub vehicle_id:      Option<Uuid>,
  pub team_id:         Uuid,
  pub services:        Vec<Uuid>,
  pub house_id:        Uuid,
  pub bunk_id:         Uuid,
  /// The supervising training assistant.
  pub supervisor_id:   Option<Uuid>,
  /// Whether the trainee is currently active in the training.
  pub active:          bool,
  /// Self-attended trainees mark their own attendance. False for first
  /// years, true for second years with some exceptions.
  pub self_attendance: bool,
}

/// Staff marker with an optional office assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingAssistantData {
  pub office: Option<String>,
}

/// A short-termer staying longer than two weeks; assigned services inside
/// the `[service_date, departure_date)` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortTermData {
  /// Date they begin to be assigned to service.
  pub service_date:   NaiveDate,
  /// Date they leave the training. No service on or after this point.
  pub departure_date: NaiveDate,
}

/// A hospitality guest during the semiannual training; their service
/// window opens when the account is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestData {
  /// Date they leave the training. No service on or after this point.
  pub departure_date: NaiveDate,
}

// ─── Role ────────────────────────────────────────────────────────────────────

/// The specialization a person holds — at most one, by construction.
/// The variant name serves as the `role` discriminant stored in the
/// database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "data", rename_all = "snake_case")]
pub enum Role {
  #[default]
  None,
  Trainee(TraineeData),
  TrainingAssistant(TrainingAssistantData),
  ShortTermTrainee(ShortTermData),
  HospitalityGuest(GuestData),
}

impl Role {
  /// The discriminant string stored in the `role` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn discriminant(&self) -> &'static str {
    match self {
      Self::None => "none",
      Self::Trainee(_) => "trainee",
      Self::TrainingAssistant(_) => "training_assistant",
      Self::ShortTermTrainee(_) => "short_term_trainee",
      Self::HospitalityGuest(_) => "hospitality_guest",
    }
  }

  /// The specialization kind, or `None` for a bare base record.
  pub fn kind(&self) -> Option<RoleKind> {
    match self {
      Self::None => None,
      Self::Trainee(_) => Some(RoleKind::Trainee),
      Self::TrainingAssistant(_) => Some(RoleKind::TrainingAssistant),
      Self::ShortTermTrainee(_) => Some(RoleKind::ShortTermTrainee),
      Self::HospitalityGuest(_) => Some(RoleKind::HospitalityGuest),
    }
  }

  /// Serialise the payload (without the discriminant tag) for the
  /// `role_json` database column.
  pub fn to_json(&self) -> crate::Result<serde_json::Value> {
    // The full serialised form is `{"role": "...", "data": <payload>}`.
    // We want only the payload.
    let full = serde_json::to_value(self)?;
    Ok(full.get("data").cloned().unwrap_or(serde_json::Value::Null))
  }

  /// Deserialise from the discriminant string and JSON payload stored in
  /// the database.
  pub fn from_parts(
    discriminant: &str,
    data: serde_json::Value,
  ) -> crate::Result<Self> {
    let wrapped = serde_json::json!({ "role": discriminant, "data": data });
    Ok(serde_json::from_value(wrapped)?)
  }
}

impl RoleKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Trainee => "trainee",
      Self::TrainingAssistant => "training_assistant",
      Self::ShortTermTrainee => "short_term_trainee",
      Self::HospitalityGuest => "hospitality_guest",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn role_payload_round_trips_through_parts() {
    let role = Role::ShortTermTrainee(ShortTermData {
      service_date:   NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
      departure_date: NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
    });

    let json = role.to_json().unwrap();
    let back = Role::from_parts(role.discriminant(), json).unwrap();
    assert_eq!(back, role);
  }

  #[test]
  fn bare_role_round_trips() {
    let json = Role::None.to_json().unwrap();
    assert_eq!(json, serde_json::Value::Null);
    let back = Role::from_parts("none", json).unwrap();
    assert_eq!(back, Role::None);
  }

  #[test]
  fn unknown_discriminant_is_rejected() {
    let err = Role::from_parts("staff", serde_json::Value::Null).unwrap_err();
    assert!(matches!(err, crate::Error::Serialization(_)));
  }

  #[test]
  fn kind_matches_discriminant() {
    assert_eq!(Role::None.kind(), None);
    let ta = Role::TrainingAssistant(TrainingAssistantData::default());
    assert_eq!(ta.kind(), Some(RoleKind::TrainingAssistant));
    assert_eq!(ta.kind().unwrap().as_str(), ta.discriminant());
  }
}
