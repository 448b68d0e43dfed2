//! JSON REST API for Rollbook.
//!
//! Exposes an axum [`Router`] backed by any
//! [`rollbook_core::store::RecordStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rollbook_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod persons;
pub mod reference;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::get,
};
use rollbook_core::store::RecordStore;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Persons
    .route("/persons", get(persons::list::<S>).post(persons::create::<S>))
    .route(
      "/persons/{id}",
      get(persons::get_one::<S>).put(persons::update_one::<S>),
    )
    .route("/persons/{id}/age", get(persons::age::<S>))
    .route("/persons/{id}/eligibility", get(persons::eligibility::<S>))
    .route("/persons/{id}/badge", get(persons::badge::<S>))
    .route("/persons/{id}/terms", get(persons::terms::<S>))
    .route("/persons/{id}/spouse", get(persons::spouse::<S>))
    .route("/persons/{id}/mentor", get(persons::mentor::<S>))
    // Reference data
    .route(
      "/terms",
      get(reference::list_terms::<S>).post(reference::create_term::<S>),
    )
    .route("/terms/{id}", get(reference::get_term::<S>))
    .route(
      "/teams",
      get(reference::list_teams::<S>).post(reference::create_team::<S>),
    )
    .route(
      "/houses",
      get(reference::list_houses::<S>).post(reference::create_house::<S>),
    )
    .route(
      "/bunks",
      get(reference::list_bunks::<S>).post(reference::create_bunk::<S>),
    )
    .route(
      "/services",
      get(reference::list_services::<S>).post(reference::create_service::<S>),
    )
    .route(
      "/vehicles",
      get(reference::list_vehicles::<S>).post(reference::create_vehicle::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ───────────────────────────────────────────────────────
