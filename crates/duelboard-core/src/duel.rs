//! Duels, their six fixed days, and the per-day lock state machine.
//!
//! Creating a duel always seeds the same six days (see [`DEFAULT_DAYS`]).
//! The day set is immutable in count; names and goals stay editable, and the
//! lock flips freely in both directions. Locking only blocks score writes —
//! goal edits go through regardless.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Lock state machine ──────────────────────────────────────────────────────

/// Two-state gate over score writes for one day. `Open` is the initial state;
/// there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockState {
  Open,
  Locked,
}

impl LockState {
  /// The single transition: flip between `Open` and `Locked`.
  pub fn toggle(self) -> Self {
    match self {
      LockState::Open   => LockState::Locked,
      LockState::Locked => LockState::Open,
    }
  }

  pub fn is_locked(self) -> bool {
    matches!(self, LockState::Locked)
  }
}

// ─── Duel ────────────────────────────────────────────────────────────────────

/// A dated six-day competitive event owned by one alliance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Duel {
  pub duel_id:     Uuid,
  pub alliance_id: Uuid,
  pub start_date:  NaiveDate,
  pub created_at:  DateTime<Utc>,
}

// ─── Day ─────────────────────────────────────────────────────────────────────

/// One of the six slots in a duel. `lock_changed_at` records the last lock
/// transition and drives "latest locked day" selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Day {
  pub day_id:          Uuid,
  pub duel_id:         Uuid,
  pub day_number:      u8,
  pub name:            String,
  pub score_goal:      f64,
  pub lock:            LockState,
  pub lock_changed_at: DateTime<Utc>,
}

/// The fixed (day_number, name) slate seeded into every new duel.
pub const DEFAULT_DAYS: [(u8, &str); 6] = [
  (1, "Radar Training"),
  (2, "Hero Development"),
  (3, "Building and Research"),
  (4, "Troop Training"),
  (5, "Kill Enemies"),
  (6, "Free Development"),
];

/// Goal every seeded day starts with.
pub const DEFAULT_SCORE_GOAL: f64 = 0.0;

/// A goal is any finite non-negative number.
pub fn validate_goal(goal: f64) -> Result<f64> {
  if goal.is_finite() && goal >= 0.0 {
    Ok(goal)
  } else {
    Err(Error::InvalidGoal(goal))
  }
}

pub fn validate_day_number(number: i64) -> Result<u8> {
  if (1..=6).contains(&number) {
    Ok(number as u8)
  } else {
    Err(Error::InvalidDayNumber(number))
  }
}
