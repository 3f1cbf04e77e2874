//! Handlers for roster endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/players?alliance_id=<uuid>` | ordered by username |
//! | `POST`   | `/players` | body: `{"allianceId":…,"username":…,"rank":"R1","level":n,"notes":…}` |
//! | `PATCH`  | `/players/{player_id}` | partial update |
//! | `PATCH`  | `/players/{player_id}/toggle-active` | flip the active flag |
//! | `DELETE` | `/players/{player_id}` | scores go with the player |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use duelboard_core::{
  alliance::{NewPlayer, Player, PlayerUpdate, Rank, validate_level},
  store::DuelStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub alliance_id: Uuid,
}

/// `GET /players?alliance_id=<uuid>`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Player>>, ApiError>
where
  S: DuelStore + Clone + Send + Sync + 'static,
{
  let players = state
    .store
    .list_players(params.alliance_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(players))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(rename = "allianceId")]
  pub alliance_id: Uuid,
  pub username:    String,
  pub rank:        Rank,
  pub level:       i64,
  pub notes:       Option<String>,
}

/// `POST /players`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DuelStore + Clone + Send + Sync + 'static,
{
  let level = validate_level(body.level)?;
  let player = state
    .store
    .add_player(NewPlayer {
      alliance_id: body.alliance_id,
      username:    body.username,
      rank:        body.rank,
      level,
      notes:       body.notes,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(player)))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PATCH /players/{player_id}` — fields absent from the body are untouched.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(player_id): Path<Uuid>,
  Json(body): Json<PlayerUpdate>,
) -> Result<Json<Player>, ApiError>
where
  S: DuelStore + Clone + Send + Sync + 'static,
{
  let player = state
    .store
    .update_player(player_id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(player))
}

/// `PATCH /players/{player_id}/toggle-active`
pub async fn toggle_active<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(player_id): Path<Uuid>,
) -> Result<Json<Player>, ApiError>
where
  S: DuelStore + Clone + Send + Sync + 'static,
{
  let player = state
    .store
    .toggle_player_active(player_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(player))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /players/{player_id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(player_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DuelStore + Clone + Send + Sync + 'static,
{
  state
    .store
    .delete_player(player_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
