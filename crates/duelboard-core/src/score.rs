//! Score values, wire-input normalization, and the per-duel score book.
//!
//! A score is at most one record per (player, day). Absence of a record and a
//! stored null both mean "not attempted" ("NA") — distinct from zero, which
//! is a real result.

use std::collections::HashMap;

use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::{Error, Result, duel::Day};

/// Round to one decimal place — the precision used everywhere a score or
/// percentage surfaces.
pub fn round1(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

// ─── Input normalization ─────────────────────────────────────────────────────

/// A submitted score as it arrives over the wire: a JSON number, or a string
/// that may be blank, the literal `"NA"`, or numeric text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawScore {
  Number(f64),
  Text(String),
}

impl RawScore {
  /// Normalize to the stored form: blank or `"NA"` become null; everything
  /// else must parse as a finite non-negative number.
  pub fn normalize(&self) -> Result<Option<f64>> {
    match self {
      RawScore::Number(n) => check(*n).map(Some),
      RawScore::Text(s) if s.trim().is_empty() || s == "NA" => Ok(None),
      RawScore::Text(s) => s
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::UnparseableScore(s.clone()))
        .and_then(check)
        .map(Some),
    }
  }
}

fn check(n: f64) -> Result<f64> {
  if !n.is_finite() {
    Err(Error::UnparseableScore(n.to_string()))
  } else if n < 0.0 {
    Err(Error::NegativeScore(n))
  } else {
    Ok(n)
  }
}

// ─── Stored score ────────────────────────────────────────────────────────────

/// A persisted score record, jointly keyed by (player, day).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
  pub score_id:  Uuid,
  pub day_id:    Uuid,
  pub player_id: Uuid,
  pub value:     Option<f64>,
}

/// JSON rendering of a score value: numbers stay numbers, an unattempted day
/// renders as the string `"NA"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreValue(pub Option<f64>);

impl Serialize for ScoreValue {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    match self.0 {
      Some(v) => serializer.serialize_f64(v),
      None    => serializer.serialize_str("NA"),
    }
  }
}

// ─── Score book ──────────────────────────────────────────────────────────────

/// All scores of one duel, keyed by (player, day).
///
/// Null and absent entries are equivalent for every consumer, so [`get`]
/// flattens them: it answers `Some` only for a submitted non-null value.
///
/// [`get`]: ScoreBook::get
#[derive(Debug, Clone, Default)]
pub struct ScoreBook {
  entries: HashMap<(Uuid, Uuid), Option<f64>>,
}

impl ScoreBook {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn put(&mut self, player_id: Uuid, day_id: Uuid, value: Option<f64>) {
    self.entries.insert((player_id, day_id), value);
  }

  /// The submitted value for (player, day), or `None` for "not attempted".
  pub fn get(&self, player_id: Uuid, day_id: Uuid) -> Option<f64> {
    self.entries.get(&(player_id, day_id)).copied().flatten()
  }

  /// Running total across `days`: null and absent scores contribute 0,
  /// rounded to one decimal.
  pub fn player_total(&self, player_id: Uuid, days: &[Day]) -> f64 {
    let sum: f64 = days
      .iter()
      .map(|day| self.get(player_id, day.day_id).unwrap_or(0.0))
      .sum();
    round1(sum)
  }
}
