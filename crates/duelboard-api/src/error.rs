//! API error type and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use duelboard_core::ErrorKind;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Unprocessable(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  /// Route a store failure through the engine taxonomy to pick a status.
  pub fn from_store<E: Into<duelboard_core::Error>>(e: E) -> Self {
    Self::from(e.into())
  }
}

impl From<duelboard_core::Error> for ApiError {
  fn from(e: duelboard_core::Error) -> Self {
    use duelboard_core::Error as E;
    match e.kind() {
      ErrorKind::NotFound => ApiError::NotFound(match e {
        E::AllianceNotFound(_) => "Alliance not found".to_owned(),
        E::DuelNotFound(_) => "Duel not found".to_owned(),
        E::DayNotFound(_) => "Day not found".to_owned(),
        E::PlayerNotFound(_) => "Player not found".to_owned(),
        other => other.to_string(),
      }),
      ErrorKind::Validation | ErrorKind::State => {
        ApiError::Unprocessable(e.to_string())
      }
      ErrorKind::Storage => ApiError::Internal(e.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Unauthorized => {
        let mut res =
          (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"duelboard\""),
        );
        res
      }
      ApiError::NotFound(msg) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
      }
      ApiError::Unprocessable(msg) => {
        (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": msg })))
          .into_response()
      }
      ApiError::Internal(msg) => {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": msg })))
          .into_response()
      }
    }
  }
}
