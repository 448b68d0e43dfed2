//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO 8601
//! (`YYYY-MM-DD`). The role payload is stored as compact JSON next to its
//! discriminant. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use rollbook_core::{
  person::{Address, Gender, Person},
  reference::{Bunk, House, Service, Team, Term, Vehicle},
  role::Role,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_opt_uuid(s: Option<&str>) -> Result<Option<Uuid>> {
  s.map(decode_uuid).transpose()
}

// ─── DateTime<Utc> / NaiveDate ───────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse().map_err(|_| Error::DateParse(format!("bad date: {s:?}")))
}

// ─── Gender ──────────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> &'static str { g.code() }

/// Codes outside `B`/`S` surface the core validation error.
pub fn decode_gender(s: &str) -> Result<Gender> {
  Ok(Gender::from_code(s)?)
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(role: &Role) -> Result<(&'static str, String)> {
  let payload = role.to_json()?;
  Ok((role.discriminant(), payload.to_string()))
}

pub fn decode_role(discriminant: &str, payload: &str) -> Result<Role> {
  let data: serde_json::Value = serde_json::from_str(payload)?;
  Ok(Role::from_parts(discriminant, data)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `persons` row.
pub struct RawPerson {
  pub person_id:   String,
  pub created_at:  String,
  pub given_name:  String,
  pub middle_name: Option<String>,
  pub nickname:    Option<String>,
  pub maiden_name: Option<String>,
  pub family_name: String,
  pub birthdate:   String,
  pub gender:      String,
  pub married:     bool,
  pub street:      String,
  pub locality:    String,
  pub region:      Option<String>,
  pub postal_code: Option<String>,
  pub country:     Option<String>,
  pub spouse_id:   Option<String>,
  pub role:        String,
  pub role_json:   String,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:   decode_uuid(&self.person_id)?,
      created_at:  decode_dt(&self.created_at)?,
      given_name:  self.given_name,
      middle_name: self.middle_name,
      nickname:    self.nickname,
      maiden_name: self.maiden_name,
      family_name: self.family_name,
      birthdate:   decode_date(&self.birthdate)?,
      gender:      decode_gender(&self.gender)?,
      married:     self.married,
      address:     Address {
        street:      self.street,
        locality:    self.locality,
        region:      self.region,
        postal_code: self.postal_code,
        country:     self.country,
      },
      spouse_id:   decode_opt_uuid(self.spouse_id.as_deref())?,
      role:        decode_role(&self.role, &self.role_json)?,
    })
  }
}

/// Raw strings read directly from a `terms` row.
pub struct RawTerm {
  pub term_id: String,
  pub code:    String,
  pub name:    String,
  pub start:   String,
  pub end:     String,
}

impl RawTerm {
  pub fn into_term(self) -> Result<Term> {
    Ok(Term {
      term_id: decode_uuid(&self.term_id)?,
      code:    self.code,
      name:    self.name,
      start:   decode_date(&self.start)?,
      end:     decode_date(&self.end)?,
    })
  }
}

pub struct RawTeam {
  pub team_id:  String,
  pub name:     String,
  pub locality: Option<String>,
}

impl RawTeam {
  pub fn into_team(self) -> Result<Team> {
    Ok(Team {
      team_id:  decode_uuid(&self.team_id)?,
      name:     self.name,
      locality: self.locality,
    })
  }
}

pub struct RawHouse {
  pub house_id: String,
  pub name:     String,
  pub gender:   String,
}

impl RawHouse {
  pub fn into_house(self) -> Result<House> {
    Ok(House {
      house_id: decode_uuid(&self.house_id)?,
      name:     self.name,
      gender:   decode_gender(&self.gender)?,
    })
  }
}

pub struct RawBunk {
  pub bunk_id:  String,
  pub number:   u32,
  pub house_id: String,
}

impl RawBunk {
  pub fn into_bunk(self) -> Result<Bunk> {
    Ok(Bunk {
      bunk_id:  decode_uuid(&self.bunk_id)?,
      number:   self.number,
      house_id: decode_uuid(&self.house_id)?,
    })
  }
}

pub struct RawService {
  pub service_id: String,
  pub name:       String,
  pub category:   Option<String>,
}

impl RawService {
  pub fn into_service(self) -> Result<Service> {
    Ok(Service {
      service_id: decode_uuid(&self.service_id)?,
      name:       self.name,
      category:   self.category,
    })
  }
}

pub struct RawVehicle {
  pub vehicle_id:    String,
  pub description:   String,
  pub license_plate: String,
  pub capacity:      u8,
}

impl RawVehicle {
  pub fn into_vehicle(self) -> Result<Vehicle> {
    Ok(Vehicle {
      vehicle_id:    decode_uuid(&self.vehicle_id)?,
      description:   self.description,
      license_plate: self.license_plate,
      capacity:      self.capacity,
    })
  }
}
