//! Row ↔ domain conversions for the SQLite store.
//!
//! Raw structs hold exactly what the database row holds; fallible `into_*`
//! methods turn them into domain types.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use duelboard_core::{
  alliance::{Alliance, Player, Rank},
  duel::{validate_day_number, Day, Duel, LockState},
  score::Score,
};

use crate::Result;

// ─── Scalar codecs ───────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.to_string()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn encode_date(date: NaiveDate) -> String {
  date.to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Ok(Uuid::parse_str(s)?)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  Ok(s.parse()?)
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

pub struct RawAlliance {
  pub alliance_id: String,
  pub name:        String,
  pub tag:         String,
  pub created_at:  String,
}

impl RawAlliance {
  pub fn into_alliance(self) -> Result<Alliance> {
    Ok(Alliance {
      alliance_id: decode_uuid(&self.alliance_id)?,
      name:        self.name,
      tag:         self.tag,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawPlayer {
  pub player_id:   String,
  pub alliance_id: String,
  pub username:    String,
  pub rank:        String,
  pub level:       i64,
  pub notes:       Option<String>,
  pub active:      bool,
  pub created_at:  String,
}

impl RawPlayer {
  pub fn into_player(self) -> Result<Player> {
    Ok(Player {
      player_id:   decode_uuid(&self.player_id)?,
      alliance_id: decode_uuid(&self.alliance_id)?,
      username:    self.username,
      rank:        self.rank.parse::<Rank>()?,
      level:       duelboard_core::alliance::validate_level(self.level)?,
      active:      self.active,
      notes:       self.notes,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawDuel {
  pub duel_id:     String,
  pub alliance_id: String,
  pub start_date:  String,
  pub created_at:  String,
}

impl RawDuel {
  pub fn into_duel(self) -> Result<Duel> {
    Ok(Duel {
      duel_id:     decode_uuid(&self.duel_id)?,
      alliance_id: decode_uuid(&self.alliance_id)?,
      start_date:  decode_date(&self.start_date)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawDay {
  pub day_id:          String,
  pub duel_id:         String,
  pub day_number:      i64,
  pub name:            String,
  pub score_goal:      f64,
  pub locked:          bool,
  pub lock_changed_at: String,
}

impl RawDay {
  pub fn into_day(self) -> Result<Day> {
    Ok(Day {
      day_id:          decode_uuid(&self.day_id)?,
      duel_id:         decode_uuid(&self.duel_id)?,
      day_number:      validate_day_number(self.day_number)?,
      name:            self.name,
      score_goal:      self.score_goal,
      lock:            if self.locked { LockState::Locked } else { LockState::Open },
      lock_changed_at: decode_dt(&self.lock_changed_at)?,
    })
  }
}

pub struct RawScore {
  pub score_id:  String,
  pub day_id:    String,
  pub player_id: String,
  pub score:     Option<f64>,
}

impl RawScore {
  pub fn into_score(self) -> Result<Score> {
    Ok(Score {
      score_id:  decode_uuid(&self.score_id)?,
      day_id:    decode_uuid(&self.day_id)?,
      player_id: decode_uuid(&self.player_id)?,
      value:     self.score,
    })
  }
}
