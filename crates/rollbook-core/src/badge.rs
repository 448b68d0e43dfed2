//! Badge pre-population — the name/role seed the badge (ID photo)
//! subsystem reads from a person record, and the upload-path layout for
//! badge images.
//!
//! The badge subsystem itself (image handling, thumbnails) is out of
//! scope; this module only exposes what it pre-populates from. The term is
//! always passed explicitly by the caller so the output is deterministic —
//! there is no ambient "current term" lookup.

use serde::{Deserialize, Serialize};

use crate::person::Person;

/// There are different badges for trainees and staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeKind {
  Trainee,
  Staff,
}

impl BadgeKind {
  /// Training assistants get staff badges; every other specialization
  /// gets a trainee badge. A bare base record has no badge.
  pub fn for_person(person: &Person) -> Option<Self> {
    use crate::role::RoleKind;
    match person.role_kind()? {
      RoleKind::TrainingAssistant => Some(Self::Staff),
      RoleKind::Trainee
      | RoleKind::ShortTermTrainee
      | RoleKind::HospitalityGuest => Some(Self::Trainee),
    }
  }
}

/// The fields a badge is pre-populated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeSeed {
  pub kind:        BadgeKind,
  pub first_name:  String,
  pub middle_name: Option<String>,
  pub last_name:   String,
}

impl BadgeSeed {
  /// `None` if the person holds no specialization (bare records are not
  /// badged).
  pub fn for_person(person: &Person) -> Option<Self> {
    Some(Self {
      kind:        BadgeKind::for_person(person)?,
      first_name:  person.given_name.clone(),
      middle_name: person.middle_name.clone(),
      last_name:   person.family_name.clone(),
    })
  }
}

/// Storage path for a badge image. Trainee badges are filed under the term
/// they were taken in; staff badges are term-less.
pub fn upload_path(kind: BadgeKind, term_code: &str, filename: &str) -> String {
  match kind {
    BadgeKind::Trainee => format!("badges/trainees/{term_code}/{filename}"),
    BadgeKind::Staff => format!("badges/staff/{filename}"),
  }
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, TimeZone, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::{
    person::{Address, Gender, Person},
    role::{GuestData, Role, TrainingAssistantData},
  };

  fn person(role: Role) -> Person {
    Person {
      person_id:   Uuid::new_v4(),
      created_at:  Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
      given_name:  "Ruth".into(),
      middle_name: Some("A".into()),
      nickname:    None,
      maiden_name: None,
      family_name: "Park".into(),
      birthdate:   NaiveDate::from_ymd_opt(1999, 1, 2).unwrap(),
      gender:      Gender::Sister,
      married:     false,
      address:     Address::default(),
      spouse_id:   None,
      role,
    }
  }

  #[test]
  fn staff_badge_for_training_assistant() {
    let p = person(Role::TrainingAssistant(TrainingAssistantData::default()));
    let seed = BadgeSeed::for_person(&p).unwrap();
    assert_eq!(seed.kind, BadgeKind::Staff);
    assert_eq!(seed.first_name, "Ruth");
    assert_eq!(seed.last_name, "Park");
  }

  #[test]
  fn trainee_badge_for_guests() {
    let p = person(Role::HospitalityGuest(GuestData {
      departure_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
    }));
    assert_eq!(BadgeKind::for_person(&p), Some(BadgeKind::Trainee));
  }

  #[test]
  fn bare_records_are_not_badged() {
    assert!(BadgeSeed::for_person(&person(Role::None)).is_none());
  }

  #[test]
  fn upload_paths() {
    assert_eq!(
      upload_path(BadgeKind::Trainee, "Fa13", "ruth.jpg"),
      "badges/trainees/Fa13/ruth.jpg"
    );
    assert_eq!(
      upload_path(BadgeKind::Staff, "Fa13", "ruth.jpg"),
      "badges/staff/ruth.jpg"
    );
  }
}
