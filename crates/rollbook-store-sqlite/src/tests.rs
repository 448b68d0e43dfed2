//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use rollbook_core::{
  person::{Address, Gender, NewPerson},
  reference::{NewBunk, NewHouse, NewService, NewTeam, NewTerm, NewVehicle},
  role::{
    EmergencyInfo, GuestData, Role, RoleKind, ShortTermData, TraineeData,
    TraineeKind,
  },
  store::{PersonQuery, RecordStore},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn base_person(given: &str, family: &str) -> NewPerson {
  NewPerson {
    given_name:  given.into(),
    middle_name: None,
    nickname:    None,
    maiden_name: None,
    family_name: family.into(),
    birthdate:   d(2000, 3, 15),
    gender:      Gender::Brother,
    married:     false,
    address:     Address {
      street:      "1234 S Olive St".into(),
      locality:    "Anaheim".into(),
      region:      Some("CA".into()),
      postal_code: Some("92805".into()),
      country:     None,
    },
    spouse_id:   None,
    role:        Role::None,
  }
}

fn emergency_info() -> EmergencyInfo {
  EmergencyInfo {
    contact_name:    "Grace Huang".into(),
    relationship:    "mother".into(),
    phone:           "555-0142".into(),
    alternate_phone: None,
    address:         None,
  }
}

/// Seed the reference rows a trainee needs and return a ready trainee
/// payload pointing at them.
async fn seeded_trainee_data(s: &SqliteStore) -> TraineeData {
  let term = s
    .add_term(NewTerm {
      code:  "Fa24".into(),
      name:  "Fall 2024".into(),
      start: d(2024, 8, 19),
      end:   d(2024, 12, 20),
    })
    .await
    .unwrap();
  let team = s
    .add_team(NewTeam { name: "Anaheim GTCA".into(), locality: None })
    .await
    .unwrap();
  let house = s
    .add_house(NewHouse { name: "Rosewood".into(), gender: Gender::Brother })
    .await
    .unwrap();
  let bunk = s
    .add_bunk(NewBunk { number: 7, house_id: house.house_id })
    .await
    .unwrap();
  let service = s
    .add_service(NewService { name: "Kitchen cleanup".into(), category: None })
    .await
    .unwrap();

  TraineeData {
    terms:           vec![term.term_id],
    kind:            TraineeKind::Regular,
    emergency_info:  Some(emergency_info()),
    date_begin:      d(2024, 8, 19),
    date_end:        d(2025, 5, 30),
    degree:          "BA History".into(),
    mentor_id:       None,
    vehicle_id:      None,
    team_id:         team.team_id,
    services:        vec![service.service_id],
    house_id:        house.house_id,
    bunk_id:         bunk.bunk_id,
    supervisor_id:   None,
    active:          true,
    self_attendance: false,
  }
}

fn violation_fields(err: Error) -> Vec<String> {
  match err {
    Error::Core(rollbook_core::Error::Validation(v)) => {
      v.iter().map(|x| x.field.clone()).collect()
    }
    other => panic!("expected validation error, got {other:?}"),
  }
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_person() {
  let s = store().await;

  let person = s.add_person(base_person("Chen", "Lee")).await.unwrap();
  assert_eq!(person.role_kind(), None);

  let fetched = s.get_person(person.person_id).await.unwrap().unwrap();
  assert_eq!(fetched, person);
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn trainee_round_trips_with_identical_fields() {
  let s = store().await;
  let data = seeded_trainee_data(&s).await;

  let mut input = base_person("Ruth", "Park");
  input.gender = Gender::Sister;
  input.role = Role::Trainee(data.clone());

  let person = s.add_person(input).await.unwrap();
  let fetched = s.get_person(person.person_id).await.unwrap().unwrap();

  assert_eq!(fetched, person);
  match fetched.role {
    Role::Trainee(fetched_data) => assert_eq!(fetched_data, data),
    other => panic!("expected trainee, got {other:?}"),
  }
}

#[tokio::test]
async fn trainee_without_emergency_info_is_rejected() {
  let s = store().await;
  let mut data = seeded_trainee_data(&s).await;
  data.emergency_info = None;

  let mut input = base_person("Ruth", "Park");
  input.role = Role::Trainee(data);

  let fields = violation_fields(s.add_person(input).await.unwrap_err());
  assert_eq!(fields, ["emergency_info"]);
}

#[tokio::test]
async fn unknown_reference_ids_are_reported_per_field() {
  let s = store().await;
  let mut data = seeded_trainee_data(&s).await;
  data.team_id = Uuid::new_v4();
  data.bunk_id = Uuid::new_v4();
  data.services.push(Uuid::new_v4());

  let mut input = base_person("Ruth", "Park");
  input.role = Role::Trainee(data);

  let fields = violation_fields(s.add_person(input).await.unwrap_err());
  assert_eq!(fields, ["team_id", "bunk_id", "services"]);
}

#[tokio::test]
async fn structural_and_referential_violations_combine() {
  let s = store().await;
  let mut data = seeded_trainee_data(&s).await;
  data.emergency_info = None;
  data.house_id = Uuid::new_v4();

  let mut input = base_person("Ruth", "Park");
  input.birthdate = d(2099, 1, 1);
  input.role = Role::Trainee(data);

  let fields = violation_fields(s.add_person(input).await.unwrap_err());
  assert_eq!(fields, ["birthdate", "emergency_info", "house_id"]);
}

#[tokio::test]
async fn future_birthdate_is_rejected_at_write_time() {
  let s = store().await;
  let mut input = base_person("Chen", "Lee");
  input.birthdate = d(2099, 1, 1);

  let fields = violation_fields(s.add_person(input).await.unwrap_err());
  assert_eq!(fields, ["birthdate"]);
}

#[tokio::test]
async fn update_preserves_created_at_and_replaces_fields() {
  let s = store().await;
  let person = s.add_person(base_person("Chen", "Lee")).await.unwrap();

  let mut input = base_person("Chen", "Lee");
  input.nickname = Some("CL".into());
  input.married = true;

  let updated = s.update_person(person.person_id, input).await.unwrap();
  assert_eq!(updated.person_id, person.person_id);
  assert_eq!(updated.created_at, person.created_at);
  assert_eq!(updated.nickname.as_deref(), Some("CL"));
  assert!(updated.married);

  let fetched = s.get_person(person.person_id).await.unwrap().unwrap();
  assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_missing_person_is_not_found() {
  let s = store().await;
  let err = s
    .update_person(Uuid::new_v4(), base_person("Chen", "Lee"))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(rollbook_core::Error::PersonNotFound(_))
  ));
}

#[tokio::test]
async fn update_rejects_self_mentoring() {
  let s = store().await;
  let data = seeded_trainee_data(&s).await;

  let mut input = base_person("Ruth", "Park");
  input.role = Role::Trainee(data.clone());
  let person = s.add_person(input).await.unwrap();

  let mut data = data;
  data.mentor_id = Some(person.person_id);
  let mut input = base_person("Ruth", "Park");
  input.role = Role::Trainee(data);

  let fields =
    violation_fields(s.update_person(person.person_id, input).await.unwrap_err());
  assert_eq!(fields, ["mentor_id"]);
}

// ─── Roster queries ──────────────────────────────────────────────────────────

#[tokio::test]
async fn list_persons_filters_by_role() {
  let s = store().await;
  let data = seeded_trainee_data(&s).await;

  s.add_person(base_person("Aaron", "Chu")).await.unwrap();

  let mut ta = base_person("Beth", "Ng");
  ta.gender = Gender::Sister;
  ta.role = Role::TrainingAssistant(Default::default());
  s.add_person(ta).await.unwrap();

  let mut trainee = base_person("Caleb", "Wong");
  trainee.role = Role::Trainee(data);
  s.add_person(trainee).await.unwrap();

  let all = s.list_persons(&PersonQuery::default()).await.unwrap();
  assert_eq!(all.len(), 3);

  let query = PersonQuery { role: Some(RoleKind::Trainee), ..Default::default() };
  let trainees = s.list_persons(&query).await.unwrap();
  assert_eq!(trainees.len(), 1);
  assert_eq!(trainees[0].given_name, "Caleb");
}

#[tokio::test]
async fn list_persons_filters_by_active_and_term() {
  let s = store().await;
  let data = seeded_trainee_data(&s).await;
  let enrolled_term = data.terms[0];

  let mut active = base_person("Caleb", "Wong");
  active.role = Role::Trainee(data.clone());
  s.add_person(active).await.unwrap();

  let mut inactive_data = data.clone();
  inactive_data.active = false;
  inactive_data.terms = vec![];
  let mut inactive = base_person("Dan", "Yu");
  inactive.role = Role::Trainee(inactive_data);
  s.add_person(inactive).await.unwrap();

  let query = PersonQuery { active: Some(true), ..Default::default() };
  let actives = s.list_persons(&query).await.unwrap();
  assert_eq!(actives.len(), 1);
  assert_eq!(actives[0].given_name, "Caleb");

  let query = PersonQuery { term: Some(enrolled_term), ..Default::default() };
  let in_term = s.list_persons(&query).await.unwrap();
  assert_eq!(in_term.len(), 1);
  assert_eq!(in_term[0].given_name, "Caleb");

  let query = PersonQuery { term: Some(Uuid::new_v4()), ..Default::default() };
  assert!(s.list_persons(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_persons_is_ordered_by_family_name() {
  let s = store().await;
  s.add_person(base_person("Zed", "Zhou")).await.unwrap();
  s.add_person(base_person("Amy", "Adams")).await.unwrap();
  s.add_person(base_person("Mia", "Miller")).await.unwrap();

  let all = s.list_persons(&PersonQuery::default()).await.unwrap();
  let families: Vec<_> = all.iter().map(|p| p.family_name.as_str()).collect();
  assert_eq!(families, ["Adams", "Miller", "Zhou"]);
}

#[tokio::test]
async fn list_persons_applies_limit_and_offset() {
  let s = store().await;
  s.add_person(base_person("Amy", "Adams")).await.unwrap();
  s.add_person(base_person("Mia", "Miller")).await.unwrap();
  s.add_person(base_person("Zed", "Zhou")).await.unwrap();

  let query =
    PersonQuery { limit: Some(1), offset: Some(1), ..Default::default() };
  let page = s.list_persons(&query).await.unwrap();
  assert_eq!(page.len(), 1);
  assert_eq!(page[0].family_name, "Miller");
}

// ─── Derived values on stored records ────────────────────────────────────────

#[tokio::test]
async fn stored_short_termer_eligibility_window() {
  let s = store().await;
  let mut input = base_person("Evan", "Sung");
  input.role = Role::ShortTermTrainee(ShortTermData {
    service_date:   d(2024, 6, 15),
    departure_date: d(2024, 8, 15),
  });

  let person = s.add_person(input).await.unwrap();
  let fetched = s.get_person(person.person_id).await.unwrap().unwrap();

  assert!(!fetched.service_eligible_on(d(2024, 6, 14)).unwrap());
  assert!(fetched.service_eligible_on(d(2024, 6, 15)).unwrap());
  assert!(!fetched.service_eligible_on(d(2024, 8, 15)).unwrap());
}

#[tokio::test]
async fn stored_guest_window_opens_at_creation() {
  let s = store().await;
  let mut input = base_person("Faye", "Tan");
  input.gender = Gender::Sister;
  input.role =
    Role::HospitalityGuest(GuestData { departure_date: d(2099, 1, 1) });

  let person = s.add_person(input).await.unwrap();
  let today = chrono::Utc::now().date_naive();
  assert!(person.service_eligible_on(today).unwrap());
  assert!(!person.service_eligible_on(d(2099, 6, 1)).unwrap());
}

#[tokio::test]
async fn stored_birthdate_drives_age() {
  let s = store().await;
  let person = s.add_person(base_person("Chen", "Lee")).await.unwrap();
  let fetched = s.get_person(person.person_id).await.unwrap().unwrap();
  assert_eq!(fetched.age_on(d(2024, 3, 15)).unwrap(), 24);
}

// ─── Reference data ──────────────────────────────────────────────────────────

#[tokio::test]
async fn term_round_trip_and_listing() {
  let s = store().await;
  let spring = s
    .add_term(NewTerm {
      code:  "Sp25".into(),
      name:  "Spring 2025".into(),
      start: d(2025, 2, 10),
      end:   d(2025, 5, 30),
    })
    .await
    .unwrap();
  let fall = s
    .add_term(NewTerm {
      code:  "Fa24".into(),
      name:  "Fall 2024".into(),
      start: d(2024, 8, 19),
      end:   d(2024, 12, 20),
    })
    .await
    .unwrap();

  let fetched = s.get_term(spring.term_id).await.unwrap().unwrap();
  assert_eq!(fetched, spring);

  // Ordered by start date.
  let all = s.list_terms().await.unwrap();
  assert_eq!(all, vec![fall, spring]);
}

#[tokio::test]
async fn term_with_reversed_dates_is_rejected() {
  let s = store().await;
  let err = s
    .add_term(NewTerm {
      code:  "Fa24".into(),
      name:  "Fall 2024".into(),
      start: d(2024, 12, 20),
      end:   d(2024, 8, 19),
    })
    .await
    .unwrap_err();
  assert!(err.is_validation());
}

#[tokio::test]
async fn bunk_requires_existing_house() {
  let s = store().await;
  let err = s
    .add_bunk(NewBunk { number: 3, house_id: Uuid::new_v4() })
    .await
    .unwrap_err();
  let fields = violation_fields(err);
  assert_eq!(fields, ["house_id"]);
}

#[tokio::test]
async fn vehicles_round_trip() {
  let s = store().await;
  let van = s
    .add_vehicle(NewVehicle {
      description:   "White 15-passenger van".into(),
      license_plate: "7ABC123".into(),
      capacity:      15,
    })
    .await
    .unwrap();

  let all = s.list_vehicles().await.unwrap();
  assert_eq!(all, vec![van]);
}
