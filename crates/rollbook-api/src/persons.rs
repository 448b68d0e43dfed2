//! Handlers for `/persons` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/persons` | Roster filters: `role`, `active`, `term`, `limit`, `offset` |
//! | `POST` | `/persons` | Body: [`NewPerson`]; returns 201 + stored record |
//! | `GET`  | `/persons/:id` | 404 if not found |
//! | `PUT`  | `/persons/:id` | Full replacement; same validation as create |
//! | `GET`  | `/persons/:id/age` | Optional `?on=YYYY-MM-DD`, defaults to today |
//! | `GET`  | `/persons/:id/eligibility` | Required `?on=YYYY-MM-DD` |
//! | `GET`  | `/persons/:id/badge` | Required `?term=<term id>` |
//! | `GET`  | `/persons/:id/terms` | Term membership for the syllabus subsystem |
//! | `GET`  | `/persons/:id/spouse`, `/persons/:id/mentor` | Resolve self-references |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use rollbook_core::{
  badge::{BadgeKind, BadgeSeed, upload_path},
  person::{NewPerson, Person},
  reference::Term,
  role::{Role, RoleKind},
  store::{PersonQuery, RecordStore},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub role:   Option<RoleKind>,
  pub active: Option<bool>,
  /// Restrict to trainees enrolled in this term.
  pub term:   Option<Uuid>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// `GET /persons[?role=...][&active=...][&term=...][&limit=...][&offset=...]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = PersonQuery {
    role:   params.role,
    active: params.active,
    term:   params.term,
    limit:  params.limit,
    offset: params.offset,
  };

  let persons = store
    .list_persons(&query)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(persons))
}

// ─── Create / update ─────────────────────────────────────────────────────────

/// `POST /persons` — body: [`NewPerson`]
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let person = store
    .add_person(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(person)))
}

/// `PUT /persons/:id` — body: [`NewPerson`]
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewPerson>,
) -> Result<Json<Person>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let person = store
    .update_person(id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(person))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /persons/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let person = fetch_person(&*store, id).await?;
  Ok(Json(person))
}

async fn fetch_person<S>(store: &S, id: Uuid) -> Result<Person, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .get_person(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))
}

// ─── Derived values ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AgeParams {
  /// Evaluation date; defaults to today (UTC).
  pub on: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct AgeResponse {
  pub age: u32,
  pub on:  NaiveDate,
}

/// `GET /persons/:id/age[?on=YYYY-MM-DD]`
///
/// Presentation collaborators call this instead of recomputing age.
pub async fn age<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<AgeParams>,
) -> Result<Json<AgeResponse>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let person = fetch_person(&*store, id).await?;
  let on = params.on.unwrap_or_else(|| Utc::now().date_naive());
  let age = person.age_on(on)?;
  Ok(Json(AgeResponse { age, on }))
}

#[derive(Debug, Deserialize)]
pub struct EligibilityParams {
  /// Candidate service-assignment date.
  pub on: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct EligibilityResponse {
  pub eligible: bool,
  pub on:       NaiveDate,
}

/// `GET /persons/:id/eligibility?on=YYYY-MM-DD`
///
/// The service-assignment collaborator calls this before assigning.
pub async fn eligibility<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<EligibilityParams>,
) -> Result<Json<EligibilityResponse>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let person = fetch_person(&*store, id).await?;
  let eligible = person.service_eligible_on(params.on)?;
  Ok(Json(EligibilityResponse { eligible, on: params.on }))
}

// ─── Badge pre-population ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BadgeParams {
  /// The term the badge is issued for — always explicit, never ambient.
  pub term: Uuid,
}

#[derive(Debug, Serialize)]
pub struct BadgeResponse {
  pub kind:        BadgeKind,
  pub first_name:  String,
  pub middle_name: Option<String>,
  pub last_name:   String,
  /// Directory the badge image is filed under.
  pub upload_dir:  String,
}

/// `GET /persons/:id/badge?term=<term id>`
pub async fn badge<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<BadgeParams>,
) -> Result<Json<BadgeResponse>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let person = fetch_person(&*store, id).await?;
  let term = store
    .get_term(params.term)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("term {} not found", params.term)))?;

  let seed = BadgeSeed::for_person(&person).ok_or_else(|| {
    ApiError::Unprocessable(format!("person {id} holds no badged role"))
  })?;

  let upload_dir = {
    let path = upload_path(seed.kind, &term.code, "");
    path.trim_end_matches('/').to_owned()
  };

  Ok(Json(BadgeResponse {
    kind: seed.kind,
    first_name: seed.first_name,
    middle_name: seed.middle_name,
    last_name: seed.last_name,
    upload_dir,
  }))
}

// ─── Term membership ─────────────────────────────────────────────────────────

/// `GET /persons/:id/terms` — resolved term records for the syllabus
/// subsystem. Empty for non-trainees.
pub async fn terms<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Term>>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let person = fetch_person(&*store, id).await?;

  let mut terms = Vec::with_capacity(person.term_ids().len());
  for term_id in person.term_ids() {
    let term = store
      .get_term(*term_id)
      .await
      .map_err(ApiError::from_store)?
      .ok_or_else(|| ApiError::NotFound(format!("term {term_id} not found")))?;
    terms.push(term);
  }

  Ok(Json(terms))
}

// ─── Self-reference resolution ───────────────────────────────────────────────

/// `GET /persons/:id/spouse`
pub async fn spouse<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let person = fetch_person(&*store, id).await?;
  let spouse_id = person
    .spouse_id
    .ok_or_else(|| ApiError::NotFound(format!("person {id} has no spouse on record")))?;
  // The stored id may be stale; a dangling one reports NotFound rather
  // than silently returning the referring record.
  let spouse = fetch_person(&*store, spouse_id).await?;
  Ok(Json(spouse))
}

/// `GET /persons/:id/mentor`
pub async fn mentor<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let person = fetch_person(&*store, id).await?;
  let mentor_id = match &person.role {
    Role::Trainee(d) => d.mentor_id,
    _ => None,
  }
  .ok_or_else(|| ApiError::NotFound(format!("person {id} has no mentor on record")))?;

  let mentor = fetch_person(&*store, mentor_id).await?;
  Ok(Json(mentor))
}
