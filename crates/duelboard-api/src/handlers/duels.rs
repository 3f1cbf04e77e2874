//! Handlers for duel lifecycle endpoints.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use duelboard_core::{
  duel::{Day, Duel},
  store::DuelStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::ApiError};

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(rename = "allianceId")]
  pub alliance_id: Uuid,
  #[serde(rename = "startDate")]
  pub start_date:  Option<NaiveDate>,
}

/// A freshly created duel plus its seeded days.
#[derive(Debug, Serialize)]
pub struct DuelWithDays {
  pub duel: Duel,
  pub days: Vec<Day>,
}

/// `POST /duels` — body: `{"allianceId":…,"startDate":"2026-08-08"}`
///
/// A missing `startDate` is rejected before the store is touched.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DuelStore + Clone + Send + Sync + 'static,
{
  let start_date = body
    .start_date
    .ok_or(duelboard_core::Error::MissingStartDate)?;

  let (duel, days) = state
    .store
    .create_duel(body.alliance_id, start_date)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(DuelWithDays { duel, days })))
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub alliance_id: Uuid,
}

/// `GET /duels?alliance_id=<uuid>` — newest start date first.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Duel>>, ApiError>
where
  S: DuelStore + Clone + Send + Sync + 'static,
{
  let duels = state
    .store
    .list_duels(params.alliance_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(duels))
}

// ─── Days ────────────────────────────────────────────────────────────────────

/// `GET /duels/{duel_id}/days` — 404 if the duel does not exist.
pub async fn days<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(duel_id): Path<Uuid>,
) -> Result<Json<Vec<Day>>, ApiError>
where
  S: DuelStore + Clone + Send + Sync + 'static,
{
  state
    .store
    .get_duel(duel_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound("Duel not found".to_owned()))?;

  let days = state
    .store
    .list_days(duel_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(days))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /duels/{duel_id}` — cascades to days and scores.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(duel_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DuelStore + Clone + Send + Sync + 'static,
{
  state
    .store
    .delete_duel(duel_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
