//! Handler for `POST /duels/{duel_id}/days/{day_id}/scores`.
//!
//! This endpoint keeps the submission dialect of the score-entry form: every
//! body carries a `success` flag, and failures report a short human message
//! rather than the engine's error text.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use duelboard_core::{
  ErrorKind,
  score::{RawScore, ScoreValue},
  store::DuelStore,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, auth::Authenticated};

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
  #[serde(rename = "playerId")]
  pub player_id: Uuid,
  /// A number, numeric text, `"NA"`, or blank. Absent means `"NA"`.
  pub score: Option<RawScore>,
}

fn failure(status: StatusCode, message: &str) -> Response {
  (status, Json(json!({ "success": false, "error": message })))
    .into_response()
}

/// `POST /duels/{duel_id}/days/{day_id}/scores`
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path((duel_id, day_id)): Path<(Uuid, Uuid)>,
  Json(body): Json<SubmitBody>,
) -> Response
where
  S: DuelStore + Clone + Send + Sync + 'static,
{
  let value = match body.score {
    None => None,
    Some(raw) => match raw.normalize() {
      Ok(v) => v,
      Err(_) => {
        return failure(StatusCode::UNPROCESSABLE_ENTITY, "Failed to save score");
      }
    },
  };

  match state
    .store
    .submit_score(duel_id, day_id, body.player_id, value)
    .await
  {
    Ok(outcome) => (
      StatusCode::OK,
      Json(json!({
        "success": true,
        "total":   outcome.total,
        "score":   ScoreValue(outcome.score),
      })),
    )
      .into_response(),
    Err(e) => {
      use duelboard_core::Error as E;
      match e.into() {
        E::DuelNotFound(_) => failure(StatusCode::NOT_FOUND, "Duel not found"),
        E::DayNotFound(_) => failure(StatusCode::NOT_FOUND, "Day not found"),
        E::PlayerNotFound(_) => {
          failure(StatusCode::NOT_FOUND, "Player not found")
        }
        E::DayLocked(_) => {
          failure(StatusCode::UNPROCESSABLE_ENTITY, "Day is locked")
        }
        other if other.kind() == ErrorKind::Validation => {
          failure(StatusCode::UNPROCESSABLE_ENTITY, "Failed to save score")
        }
        other => {
          failure(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string())
        }
      }
    }
  }
}
