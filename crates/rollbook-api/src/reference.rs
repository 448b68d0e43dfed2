//! Handlers for reference-data endpoints.
//!
//! One `GET` (list) and one `POST` (create) per entity:
//! `/terms`, `/teams`, `/houses`, `/bunks`, `/services`, `/vehicles`.
//! Reference data is managed separately from person records; persons only
//! point at it.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rollbook_core::{
  reference::{
    Bunk, House, NewBunk, NewHouse, NewService, NewTeam, NewTerm, NewVehicle,
    Service, Team, Term, Vehicle,
  },
  store::RecordStore,
};
use uuid::Uuid;

use crate::error::ApiError;

// ─── Terms ───────────────────────────────────────────────────────────────────

/// `GET /terms`
pub async fn list_terms<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Term>>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let terms = store.list_terms().await.map_err(ApiError::from_store)?;
  Ok(Json(terms))
}

/// `GET /terms/:id`
pub async fn get_term<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Term>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let term = store
    .get_term(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("term {id} not found")))?;
  Ok(Json(term))
}

/// `POST /terms`
pub async fn create_term<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewTerm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let term = store.add_term(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(term)))
}

// ─── Teams ───────────────────────────────────────────────────────────────────

/// `GET /teams`
pub async fn list_teams<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Team>>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let teams = store.list_teams().await.map_err(ApiError::from_store)?;
  Ok(Json(teams))
}

/// `POST /teams`
pub async fn create_team<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewTeam>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let team = store.add_team(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(team)))
}

// ─── Houses ──────────────────────────────────────────────────────────────────

/// `GET /houses`
pub async fn list_houses<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<House>>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let houses = store.list_houses().await.map_err(ApiError::from_store)?;
  Ok(Json(houses))
}

/// `POST /houses`
pub async fn create_house<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewHouse>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let house = store.add_house(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(house)))
}

// ─── Bunks ───────────────────────────────────────────────────────────────────

/// `GET /bunks`
pub async fn list_bunks<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Bunk>>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let bunks = store.list_bunks().await.map_err(ApiError::from_store)?;
  Ok(Json(bunks))
}

/// `POST /bunks` — 422 if the house does not exist.
pub async fn create_bunk<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewBunk>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let bunk = store.add_bunk(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(bunk)))
}

// ─── Services ────────────────────────────────────────────────────────────────

/// `GET /services`
pub async fn list_services<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Service>>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let services = store.list_services().await.map_err(ApiError::from_store)?;
  Ok(Json(services))
}

/// `POST /services`
pub async fn create_service<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewService>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let service = store.add_service(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(service)))
}

// ─── Vehicles ────────────────────────────────────────────────────────────────

/// `GET /vehicles`
pub async fn list_vehicles<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Vehicle>>, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let vehicles = store.list_vehicles().await.map_err(ApiError::from_store)?;
  Ok(Json(vehicles))
}

/// `POST /vehicles`
pub async fn create_vehicle<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewVehicle>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let vehicle = store.add_vehicle(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(vehicle)))
}
