//! Handler for `POST /alliances`.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use duelboard_core::{alliance::NewAlliance, store::DuelStore};
use serde::Deserialize;

use crate::{AppState, auth::Authenticated, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
  pub tag:  String,
}

/// `POST /alliances` — body: `{"name":"…","tag":"TEST"}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DuelStore + Clone + Send + Sync + 'static,
{
  let alliance = state
    .store
    .create_alliance(NewAlliance { name: body.name, tag: body.tag })
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(alliance)))
}
