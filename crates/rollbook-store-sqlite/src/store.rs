//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use rollbook_core::{
  person::{NewPerson, Person},
  reference::{
    Bunk, House, NewBunk, NewHouse, NewService, NewTeam, NewTerm, NewVehicle,
    Service, Team, Term, Vehicle,
  },
  role::Role,
  store::{PersonQuery, RecordStore},
  validate::{Violation, Violations},
};

use crate::{
  Error, Result,
  encode::{
    RawBunk, RawHouse, RawPerson, RawService, RawTeam, RawTerm, RawVehicle,
    encode_date, encode_dt, encode_gender, encode_role, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rollbook record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Whether a reference-data row with this id exists.
  async fn id_exists(
    &self,
    table: &'static str,
    column: &'static str,
    id: Uuid,
  ) -> Result<bool> {
    let id_str = encode_uuid(id);
    let exists: bool = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT 1 FROM {table} WHERE {column} = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], |_| Ok(true))
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  /// Check that every reference-data id the input names actually exists.
  /// Person-to-person ids (spouse, mentor, supervisor) are deliberately
  /// not checked here; they are resolved at read time.
  async fn reference_violations(
    &self,
    input: &NewPerson,
  ) -> Result<Vec<Violation>> {
    let mut violations = Vec::new();

    if let Role::Trainee(d) = &input.role {
      for term_id in &d.terms {
        if !self.id_exists("terms", "term_id", *term_id).await? {
          violations.push(Violation::new("terms", format!("unknown term {term_id}")));
        }
      }
      if !self.id_exists("teams", "team_id", d.team_id).await? {
        violations
          .push(Violation::new("team_id", format!("unknown team {}", d.team_id)));
      }
      if !self.id_exists("houses", "house_id", d.house_id).await? {
        violations
          .push(Violation::new("house_id", format!("unknown house {}", d.house_id)));
      }
      if !self.id_exists("bunks", "bunk_id", d.bunk_id).await? {
        violations
          .push(Violation::new("bunk_id", format!("unknown bunk {}", d.bunk_id)));
      }
      for service_id in &d.services {
        if !self.id_exists("services", "service_id", *service_id).await? {
          violations.push(Violation::new(
            "services",
            format!("unknown service {service_id}"),
          ));
        }
      }
      if let Some(vehicle_id) = d.vehicle_id {
        if !self.id_exists("vehicles", "vehicle_id", vehicle_id).await? {
          violations.push(Violation::new(
            "vehicle_id",
            format!("unknown vehicle {vehicle_id}"),
          ));
        }
      }
    }

    Ok(violations)
  }

  /// Full write-time validation: structural checks first, then referential
  /// checks, all collected into one error so every offending field is
  /// reported.
  async fn validate_person(
    &self,
    person_id: Uuid,
    input: &NewPerson,
  ) -> Result<()> {
    let today = Utc::now().date_naive();

    let mut violations = match input.validate(person_id, today) {
      Ok(()) => Vec::new(),
      Err(rollbook_core::Error::Validation(v)) => v.0,
      Err(other) => return Err(other.into()),
    };

    violations.extend(self.reference_violations(input).await?);

    if violations.is_empty() {
      Ok(())
    } else {
      Err(rollbook_core::Error::Validation(Violations(violations)).into())
    }
  }

  /// Insert (or, on update, replace) a fully-built [`Person`] row.
  async fn insert_person(&self, person: &Person, replace: bool) -> Result<()> {
    let person_id_str  = encode_uuid(person.person_id);
    let created_at_str = encode_dt(person.created_at);
    let given_name     = person.given_name.clone();
    let middle_name    = person.middle_name.clone();
    let nickname       = person.nickname.clone();
    let maiden_name    = person.maiden_name.clone();
    let family_name    = person.family_name.clone();
    let birthdate_str  = encode_date(person.birthdate);
    let gender_str     = encode_gender(person.gender).to_owned();
    let married        = person.married;
    let street         = person.address.street.clone();
    let locality       = person.address.locality.clone();
    let region         = person.address.region.clone();
    let postal_code    = person.address.postal_code.clone();
    let country        = person.address.country.clone();
    let spouse_id_str  = person.spouse_id.map(encode_uuid);
    let (role_str, role_json) = encode_role(&person.role)?;
    let role_str       = role_str.to_owned();

    let verb = if replace { "INSERT OR REPLACE" } else { "INSERT" };
    let sql = format!(
      "{verb} INTO persons (
         person_id, created_at, given_name, middle_name, nickname,
         maiden_name, family_name, birthdate, gender, married,
         street, locality, region, postal_code, country,
         spouse_id, role, role_json
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                 ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)"
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &sql,
          rusqlite::params![
            person_id_str,
            created_at_str,
            given_name,
            middle_name,
            nickname,
            maiden_name,
            family_name,
            birthdate_str,
            gender_str,
            married,
            street,
            locality,
            region,
            postal_code,
            country,
            spouse_id_str,
            role_str,
            role_json,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

const PERSON_COLUMNS: &str = "person_id, created_at, given_name, middle_name, \
   nickname, maiden_name, family_name, birthdate, gender, married, \
   street, locality, region, postal_code, country, spouse_id, role, role_json";

fn raw_person_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPerson> {
  Ok(RawPerson {
    person_id:   row.get(0)?,
    created_at:  row.get(1)?,
    given_name:  row.get(2)?,
    middle_name: row.get(3)?,
    nickname:    row.get(4)?,
    maiden_name: row.get(5)?,
    family_name: row.get(6)?,
    birthdate:   row.get(7)?,
    gender:      row.get(8)?,
    married:     row.get(9)?,
    street:      row.get(10)?,
    locality:    row.get(11)?,
    region:      row.get(12)?,
    postal_code: row.get(13)?,
    country:     row.get(14)?,
    spouse_id:   row.get(15)?,
    role:        row.get(16)?,
    role_json:   row.get(17)?,
  })
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let person_id = Uuid::new_v4();
    self.validate_person(person_id, &input).await?;

    let person = Person {
      person_id,
      created_at: Utc::now(),
      given_name: input.given_name,
      middle_name: input.middle_name,
      nickname: input.nickname,
      maiden_name: input.maiden_name,
      family_name: input.family_name,
      birthdate: input.birthdate,
      gender: input.gender,
      married: input.married,
      address: input.address,
      spouse_id: input.spouse_id,
      role: input.role,
    };

    self.insert_person(&person, false).await?;
    Ok(person)
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        let sql =
          format!("SELECT {PERSON_COLUMNS} FROM persons WHERE person_id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], raw_person_from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_persons(&self, query: &PersonQuery) -> Result<Vec<Person>> {
    // The role filter runs in SQL; active/term need the decoded payload
    // and are applied after decoding, before limit/offset.
    let role_str = query.role.map(|k| k.as_str().to_owned());

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(role) = role_str {
          let sql = format!(
            "SELECT {PERSON_COLUMNS} FROM persons WHERE role = ?1
             ORDER BY family_name, given_name"
          );
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map(rusqlite::params![role], raw_person_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let sql = format!(
            "SELECT {PERSON_COLUMNS} FROM persons
             ORDER BY family_name, given_name"
          );
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map([], raw_person_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    let mut persons: Vec<Person> = raws
      .into_iter()
      .map(RawPerson::into_person)
      .collect::<Result<_>>()?;

    if let Some(active) = query.active {
      persons.retain(|p| matches!(&p.role, Role::Trainee(d) if d.active == active));
    }
    if let Some(term) = query.term {
      persons.retain(|p| p.term_ids().contains(&term));
    }

    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(usize::MAX);
    Ok(persons.into_iter().skip(offset).take(limit).collect())
  }

  async fn update_person(&self, id: Uuid, input: NewPerson) -> Result<Person> {
    // Preserve the original creation timestamp.
    let id_str = encode_uuid(id);
    let created_at_str: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT created_at FROM persons WHERE person_id = ?1",
              rusqlite::params![id_str],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    let created_at = match created_at_str {
      Some(s) => crate::encode::decode_dt(&s)?,
      None => return Err(rollbook_core::Error::PersonNotFound(id).into()),
    };

    self.validate_person(id, &input).await?;

    let person = Person {
      person_id: id,
      created_at,
      given_name: input.given_name,
      middle_name: input.middle_name,
      nickname: input.nickname,
      maiden_name: input.maiden_name,
      family_name: input.family_name,
      birthdate: input.birthdate,
      gender: input.gender,
      married: input.married,
      address: input.address,
      spouse_id: input.spouse_id,
      role: input.role,
    };

    self.insert_person(&person, true).await?;
    Ok(person)
  }

  // ── Reference data ────────────────────────────────────────────────────────

  async fn add_term(&self, input: NewTerm) -> Result<Term> {
    input.validate().map_err(Error::Core)?;

    let term = Term {
      term_id: Uuid::new_v4(),
      code:    input.code,
      name:    input.name,
      start:   input.start,
      end:     input.end,
    };

    let id_str    = encode_uuid(term.term_id);
    let code      = term.code.clone();
    let name      = term.name.clone();
    let start_str = encode_date(term.start);
    let end_str   = encode_date(term.end);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO terms (term_id, code, name, start, end)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, code, name, start_str, end_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(term)
  }

  async fn get_term(&self, id: Uuid) -> Result<Option<Term>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawTerm> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT term_id, code, name, start, end FROM terms
               WHERE term_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawTerm {
                  term_id: row.get(0)?,
                  code:    row.get(1)?,
                  name:    row.get(2)?,
                  start:   row.get(3)?,
                  end:     row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawTerm::into_term).transpose()
  }

  async fn list_terms(&self) -> Result<Vec<Term>> {
    let raws: Vec<RawTerm> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT term_id, code, name, start, end FROM terms ORDER BY start",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawTerm {
              term_id: row.get(0)?,
              code:    row.get(1)?,
              name:    row.get(2)?,
              start:   row.get(3)?,
              end:     row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTerm::into_term).collect()
  }

  async fn add_team(&self, input: NewTeam) -> Result<Team> {
    let team = Team {
      team_id:  Uuid::new_v4(),
      name:     input.name,
      locality: input.locality,
    };

    let id_str   = encode_uuid(team.team_id);
    let name     = team.name.clone();
    let locality = team.locality.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO teams (team_id, name, locality) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name, locality],
        )?;
        Ok(())
      })
      .await?;

    Ok(team)
  }

  async fn list_teams(&self) -> Result<Vec<Team>> {
    let raws: Vec<RawTeam> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT team_id, name, locality FROM teams ORDER BY name")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawTeam {
              team_id:  row.get(0)?,
              name:     row.get(1)?,
              locality: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTeam::into_team).collect()
  }

  async fn add_house(&self, input: NewHouse) -> Result<House> {
    let house = House {
      house_id: Uuid::new_v4(),
      name:     input.name,
      gender:   input.gender,
    };

    let id_str     = encode_uuid(house.house_id);
    let name       = house.name.clone();
    let gender_str = encode_gender(house.gender).to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO houses (house_id, name, gender) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name, gender_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(house)
  }

  async fn list_houses(&self) -> Result<Vec<House>> {
    let raws: Vec<RawHouse> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT house_id, name, gender FROM houses ORDER BY name")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawHouse {
              house_id: row.get(0)?,
              name:     row.get(1)?,
              gender:   row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHouse::into_house).collect()
  }

  async fn add_bunk(&self, input: NewBunk) -> Result<Bunk> {
    if !self.id_exists("houses", "house_id", input.house_id).await? {
      return Err(
        rollbook_core::Error::invalid_field(
          "house_id",
          format!("unknown house {}", input.house_id),
        )
        .into(),
      );
    }

    let bunk = Bunk {
      bunk_id:  Uuid::new_v4(),
      number:   input.number,
      house_id: input.house_id,
    };

    let id_str    = encode_uuid(bunk.bunk_id);
    let number    = bunk.number;
    let house_str = encode_uuid(bunk.house_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO bunks (bunk_id, number, house_id) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, number, house_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(bunk)
  }

  async fn list_bunks(&self) -> Result<Vec<Bunk>> {
    let raws: Vec<RawBunk> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT bunk_id, number, house_id FROM bunks ORDER BY number",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawBunk {
              bunk_id:  row.get(0)?,
              number:   row.get(1)?,
              house_id: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBunk::into_bunk).collect()
  }

  async fn add_service(&self, input: NewService) -> Result<Service> {
    let service = Service {
      service_id: Uuid::new_v4(),
      name:       input.name,
      category:   input.category,
    };

    let id_str   = encode_uuid(service.service_id);
    let name     = service.name.clone();
    let category = service.category.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO services (service_id, name, category)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name, category],
        )?;
        Ok(())
      })
      .await?;

    Ok(service)
  }

  async fn list_services(&self) -> Result<Vec<Service>> {
    let raws: Vec<RawService> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT service_id, name, category FROM services ORDER BY name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawService {
              service_id: row.get(0)?,
              name:       row.get(1)?,
              category:   row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawService::into_service).collect()
  }

  async fn add_vehicle(&self, input: NewVehicle) -> Result<Vehicle> {
    let vehicle = Vehicle {
      vehicle_id:    Uuid::new_v4(),
      description:   input.description,
      license_plate: input.license_plate,
      capacity:      input.capacity,
    };

    let id_str      = encode_uuid(vehicle.vehicle_id);
    let description = vehicle.description.clone();
    let plate       = vehicle.license_plate.clone();
    let capacity    = vehicle.capacity;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO vehicles (vehicle_id, description, license_plate, capacity)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, description, plate, capacity],
        )?;
        Ok(())
      })
      .await?;

    Ok(vehicle)
  }

  async fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
    let raws: Vec<RawVehicle> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT vehicle_id, description, license_plate, capacity
           FROM vehicles ORDER BY description",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawVehicle {
              vehicle_id:    row.get(0)?,
              description:   row.get(1)?,
              license_plate: row.get(2)?,
              capacity:      row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVehicle::into_vehicle).collect()
  }
}
