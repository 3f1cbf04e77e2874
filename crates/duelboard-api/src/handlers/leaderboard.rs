//! Handler for the public leaderboard, `GET /alliances/{tag}`.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use duelboard_core::{
  alliance::validate_tag,
  leaderboard::{build_leaderboard, current_duel},
  score::ScoreBook,
  store::DuelStore,
};

use crate::{AppState, error::ApiError};

/// `GET /alliances/{tag}` — no auth; the tag matches case-insensitively.
pub async fn show<S>(
  State(state): State<AppState<S>>,
  Path(tag): Path<String>,
) -> Result<Response, ApiError>
where
  S: DuelStore + Clone + Send + Sync + 'static,
{
  // A tag that could never exist is rejected at the routing level.
  if validate_tag(&tag).is_err() {
    return Ok(StatusCode::NOT_FOUND.into_response());
  }

  let alliance = state
    .store
    .get_alliance_by_tag(&tag)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound("Alliance not found".to_owned()))?;

  let players = state
    .store
    .list_players(alliance.alliance_id)
    .await
    .map_err(ApiError::from_store)?;
  let duels = state
    .store
    .list_duels(alliance.alliance_id)
    .await
    .map_err(ApiError::from_store)?;

  // Days and scores are only needed for the current duel, if any.
  let (days, book) = match current_duel(&duels) {
    None => (Vec::new(), ScoreBook::new()),
    Some(duel) => {
      let days = state
        .store
        .list_days(duel.duel_id)
        .await
        .map_err(ApiError::from_store)?;
      let book = state
        .store
        .scores_for_duel(duel.duel_id)
        .await
        .map_err(ApiError::from_store)?;
      (days, book)
    }
  };

  let view = build_leaderboard(&alliance, &players, &duels, &days, &book);
  Ok(Json(view).into_response())
}
