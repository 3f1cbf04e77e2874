//! Error types for `duelboard-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// An engine-level failure (validation, state, not-found) detected while
  /// executing a store operation.
  #[error(transparent)]
  Domain(#[from] duelboard_core::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("connection error: {0}")]
  Connection(#[from] tokio_rusqlite::Error),

  #[error("invalid uuid in database: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("invalid timestamp in database: {0}")]
  Timestamp(#[from] chrono::ParseError),
}

impl From<Error> for duelboard_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Domain(inner) => inner,
      other => duelboard_core::Error::Storage(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
