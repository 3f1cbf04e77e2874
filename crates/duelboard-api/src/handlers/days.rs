//! Handlers for per-day lock and goal endpoints.

use axum::{
  Json,
  extract::{Path, State},
};
use duelboard_core::{duel::Day, store::DuelStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `PATCH /days/{day_id}/lock` — flip the lock and stamp the change time.
pub async fn toggle_lock<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(day_id): Path<Uuid>,
) -> Result<Json<Day>, ApiError>
where
  S: DuelStore + Clone + Send + Sync + 'static,
{
  let day = state
    .store
    .toggle_day_lock(day_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(day))
}

#[derive(Debug, Deserialize)]
pub struct GoalBody {
  pub score_goal: f64,
}

/// `PATCH /days/{day_id}/goal` — allowed whether or not the day is locked.
pub async fn set_goal<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(day_id): Path<Uuid>,
  Json(body): Json<GoalBody>,
) -> Result<Json<Day>, ApiError>
where
  S: DuelStore + Clone + Send + Sync + 'static,
{
  let day = state
    .store
    .set_day_goal(day_id, body.score_goal)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(day))
}
