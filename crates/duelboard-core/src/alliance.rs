//! Alliance and roster types.
//!
//! An alliance owns its players and duels. Only `active` players take part in
//! any aggregation; inactive players keep their scores but drop out of every
//! computed statistic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Alliance ────────────────────────────────────────────────────────────────

/// A group of players competing together. The `tag` is the public lookup key
/// for the leaderboard and matches case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alliance {
  pub alliance_id: Uuid,
  pub name:        String,
  pub tag:         String,
  pub created_at:  DateTime<Utc>,
}

/// Input for creating an alliance.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAlliance {
  pub name: String,
  pub tag:  String,
}

/// A tag is exactly 4 ASCII alphanumeric characters.
pub fn validate_tag(tag: &str) -> Result<()> {
  if tag.len() == 4 && tag.chars().all(|c| c.is_ascii_alphanumeric()) {
    Ok(())
  } else {
    Err(Error::InvalidTag(tag.to_owned()))
  }
}

// ─── Players ─────────────────────────────────────────────────────────────────

/// In-game rank of a player within the alliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
  R1,
  R2,
  R3,
  R4,
  R5,
}

impl Rank {
  pub fn as_str(self) -> &'static str {
    match self {
      Rank::R1 => "R1",
      Rank::R2 => "R2",
      Rank::R3 => "R3",
      Rank::R4 => "R4",
      Rank::R5 => "R5",
    }
  }
}

impl std::str::FromStr for Rank {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "R1" => Ok(Rank::R1),
      "R2" => Ok(Rank::R2),
      "R3" => Ok(Rank::R3),
      "R4" => Ok(Rank::R4),
      "R5" => Ok(Rank::R5),
      _    => Err(Error::UnknownRank(s.to_owned())),
    }
  }
}

/// A roster member. Usernames are unique within an alliance,
/// case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
  pub player_id:   Uuid,
  pub alliance_id: Uuid,
  pub username:    String,
  pub rank:        Rank,
  pub level:       u8,
  pub active:      bool,
  pub notes:       Option<String>,
  pub created_at:  DateTime<Utc>,
}

/// Input for creating a player. New players start active.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPlayer {
  pub alliance_id: Uuid,
  pub username:    String,
  pub rank:        Rank,
  pub level:       u8,
  pub notes:       Option<String>,
}

/// Partial update for a player; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerUpdate {
  pub username: Option<String>,
  pub rank:     Option<Rank>,
  pub level:    Option<u8>,
  pub notes:    Option<String>,
}

/// Levels run 1 through 100 inclusive.
pub fn validate_level(level: i64) -> Result<u8> {
  if (1..=100).contains(&level) {
    Ok(level as u8)
  } else {
    Err(Error::InvalidLevel(level))
  }
}
