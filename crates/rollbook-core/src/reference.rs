//! Shared reference data — terms, teams, houses, bunks, services, vehicles.
//!
//! These records are created and managed separately from person records;
//! persons reference them by identifier and never own them. Identifiers
//! and creation order are assigned by the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, person::Gender, validate::Checker};

// ─── Term ────────────────────────────────────────────────────────────────────

/// An academic/training period a trainee can be enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
  pub term_id: Uuid,
  /// Short code used in badge upload paths, e.g. `Fa13`.
  pub code:    String,
  pub name:    String,
  pub start:   NaiveDate,
  pub end:     NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTerm {
  pub code:  String,
  pub name:  String,
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

impl NewTerm {
  pub fn validate(&self) -> Result<()> {
    let mut check = Checker::new();
    check.require(!self.code.trim().is_empty(), "code", "must not be empty");
    check.require(self.start < self.end, "start", "must precede end");
    check.finish()
  }
}

// ─── Team ────────────────────────────────────────────────────────────────────

/// A service/outreach team trainees are assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
  pub team_id:  Uuid,
  pub name:     String,
  pub locality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeam {
  pub name:     String,
  #[serde(default)]
  pub locality: Option<String>,
}

// ─── House & Bunk ────────────────────────────────────────────────────────────

/// A training residence; houses are single-gender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
  pub house_id: Uuid,
  pub name:     String,
  pub gender:   Gender,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHouse {
  pub name:   String,
  pub gender: Gender,
}

/// A numbered bunk within a house.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bunk {
  pub bunk_id:  Uuid,
  pub number:   u32,
  pub house_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBunk {
  pub number:   u32,
  pub house_id: Uuid,
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// An assignable duty, e.g. kitchen cleanup or ushering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
  pub service_id: Uuid,
  pub name:       String,
  pub category:   Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewService {
  pub name:     String,
  #[serde(default)]
  pub category: Option<String>,
}

// ─── Vehicle ─────────────────────────────────────────────────────────────────

/// A registered vehicle a trainee may drive on campus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
  pub vehicle_id:    Uuid,
  pub description:   String,
  pub license_plate: String,
  pub capacity:      u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVehicle {
  pub description:   String,
  pub license_plate: String,
  pub capacity:      u8,
}
