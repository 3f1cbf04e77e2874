//! Error types for `duelboard-core`.

use thiserror::Error;
use uuid::Uuid;

/// Coarse classification of an [`Error`], used by transport layers to choose
/// a status code without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Malformed or out-of-range input. Never retried.
  Validation,
  /// Operation disallowed by current state (e.g. writing to a locked day).
  State,
  /// Reference to a nonexistent record.
  NotFound,
  /// Backend fault outside the engine's control.
  Storage,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("alliance not found: {0:?}")]
  AllianceNotFound(String),

  #[error("duel not found: {0}")]
  DuelNotFound(Uuid),

  #[error("day not found: {0}")]
  DayNotFound(Uuid),

  #[error("player not found: {0}")]
  PlayerNotFound(Uuid),

  #[error("day {0} is locked")]
  DayLocked(Uuid),

  #[error("cannot parse score: {0:?}")]
  UnparseableScore(String),

  #[error("score must be non-negative, got {0}")]
  NegativeScore(f64),

  #[error("start date is required")]
  MissingStartDate,

  #[error("score goal must be a non-negative number, got {0}")]
  InvalidGoal(f64),

  #[error("alliance tag must be 4 alphanumeric characters, got {0:?}")]
  InvalidTag(String),

  #[error("tag {0:?} is already taken")]
  DuplicateTag(String),

  #[error("unknown rank: {0:?}")]
  UnknownRank(String),

  #[error("level must be between 1 and 100, got {0}")]
  InvalidLevel(i64),

  #[error("day number must be between 1 and 6, got {0}")]
  InvalidDayNumber(i64),

  #[error("username {0:?} is already taken in this alliance")]
  DuplicateUsername(String),

  #[error("storage error: {0}")]
  Storage(String),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::AllianceNotFound(_)
      | Error::DuelNotFound(_)
      | Error::DayNotFound(_)
      | Error::PlayerNotFound(_) => ErrorKind::NotFound,

      Error::DayLocked(_) => ErrorKind::State,

      Error::UnparseableScore(_)
      | Error::NegativeScore(_)
      | Error::MissingStartDate
      | Error::InvalidGoal(_)
      | Error::InvalidTag(_)
      | Error::DuplicateTag(_)
      | Error::UnknownRank(_)
      | Error::InvalidLevel(_)
      | Error::InvalidDayNumber(_)
      | Error::DuplicateUsername(_) => ErrorKind::Validation,

      Error::Storage(_) => ErrorKind::Storage,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
