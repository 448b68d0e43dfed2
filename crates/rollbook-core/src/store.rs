//! The `RecordStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `rollbook-store-sqlite`). Higher layers (`rollbook-api`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  person::{NewPerson, Person},
  reference::{
    Bunk, House, NewBunk, NewHouse, NewService, NewTeam, NewTerm, NewVehicle,
    Service, Team, Term, Vehicle,
  },
  role::RoleKind,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`RecordStore::list_persons`] — the roster filters the
/// list pages apply.
#[derive(Debug, Clone, Default)]
pub struct PersonQuery {
  /// Restrict to persons holding a specific specialization.
  pub role:   Option<RoleKind>,
  /// Restrict to trainees with a matching `active` flag.
  pub active: Option<bool>,
  /// Restrict to trainees enrolled in this term.
  pub term:   Option<Uuid>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Rollbook record store backend.
///
/// Write operations validate synchronously: structural violations and
/// unknown reference-data identifiers are all collected into a single
/// validation error naming each offending field. Person-to-person
/// references (spouse, mentor, supervisor) are stored unchecked and
/// resolved at read time.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Persons ───────────────────────────────────────────────────────────

  /// Validate and persist a new person record. The identifier and
  /// `created_at` timestamp are set by the store.
  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by identifier. Returns `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// List persons matching `query`.
  fn list_persons<'a>(
    &'a self,
    query: &'a PersonQuery,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Replace a person record wholesale, preserving its identifier and
  /// `created_at`. Errors if the identifier is unknown; validates like
  /// [`RecordStore::add_person`].
  fn update_person(
    &self,
    id: Uuid,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  // ── Reference data ────────────────────────────────────────────────────

  fn add_term(
    &self,
    input: NewTerm,
  ) -> impl Future<Output = Result<Term, Self::Error>> + Send + '_;

  fn get_term(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Term>, Self::Error>> + Send + '_;

  fn list_terms(
    &self,
  ) -> impl Future<Output = Result<Vec<Term>, Self::Error>> + Send + '_;

  fn add_team(
    &self,
    input: NewTeam,
  ) -> impl Future<Output = Result<Team, Self::Error>> + Send + '_;

  fn list_teams(
    &self,
  ) -> impl Future<Output = Result<Vec<Team>, Self::Error>> + Send + '_;

  fn add_house(
    &self,
    input: NewHouse,
  ) -> impl Future<Output = Result<House, Self::Error>> + Send + '_;

  fn list_houses(
    &self,
  ) -> impl Future<Output = Result<Vec<House>, Self::Error>> + Send + '_;

  /// Bunks must reference an existing house.
  fn add_bunk(
    &self,
    input: NewBunk,
  ) -> impl Future<Output = Result<Bunk, Self::Error>> + Send + '_;

  fn list_bunks(
    &self,
  ) -> impl Future<Output = Result<Vec<Bunk>, Self::Error>> + Send + '_;

  fn add_service(
    &self,
    input: NewService,
  ) -> impl Future<Output = Result<Service, Self::Error>> + Send + '_;

  fn list_services(
    &self,
  ) -> impl Future<Output = Result<Vec<Service>, Self::Error>> + Send + '_;

  fn add_vehicle(
    &self,
    input: NewVehicle,
  ) -> impl Future<Output = Result<Vehicle, Self::Error>> + Send + '_;

  fn list_vehicles(
    &self,
  ) -> impl Future<Output = Result<Vec<Vehicle>, Self::Error>> + Send + '_;
}
