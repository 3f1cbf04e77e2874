//! [`SqliteStore`] — the SQLite implementation of [`DuelStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use duelboard_core::{
  alliance::{validate_tag, Alliance, NewAlliance, NewPlayer, Player, PlayerUpdate},
  duel::{validate_goal, Day, Duel, LockState, DEFAULT_DAYS, DEFAULT_SCORE_GOAL},
  score::{round1, Score, ScoreBook},
  store::{DuelStore, SubmitOutcome},
};

use crate::{
  encode::{
    encode_date, encode_dt, encode_uuid, RawAlliance, RawDay, RawDuel, RawPlayer,
    RawScore,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A duel scoring store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_player(&self, player_id: Uuid) -> Result<Option<Player>> {
    let id_str = encode_uuid(player_id);

    let raw: Option<RawPlayer> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT player_id, alliance_id, username, rank, level, notes, active, created_at
             FROM players WHERE player_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawPlayer {
                player_id:   row.get(0)?,
                alliance_id: row.get(1)?,
                username:    row.get(2)?,
                rank:        row.get(3)?,
                level:       row.get(4)?,
                notes:       row.get(5)?,
                active:      row.get(6)?,
                created_at:  row.get(7)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPlayer::into_player).transpose()
  }

  /// True if `username` is already taken in the alliance by a player other
  /// than `except`.
  async fn username_taken(
    &self,
    alliance_id: Uuid,
    username: &str,
    except: Option<Uuid>,
  ) -> Result<bool> {
    let alliance_str = encode_uuid(alliance_id);
    let username = username.to_owned();
    let except_str = except.map(encode_uuid);

    let taken: bool = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT 1 FROM players
             WHERE alliance_id = ?1 AND username = ?2
               AND (?3 IS NULL OR player_id != ?3)",
            rusqlite::params![alliance_str, username, except_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;

    Ok(taken)
  }

  async fn persist_player(&self, player: &Player) -> Result<()> {
    let id_str       = encode_uuid(player.player_id);
    let alliance_str = encode_uuid(player.alliance_id);
    let username     = player.username.clone();
    let rank         = player.rank.as_str().to_owned();
    let level        = player.level as i64;
    let notes        = player.notes.clone();
    let active       = player.active;
    let at_str       = encode_dt(player.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO players
             (player_id, alliance_id, username, rank, level, notes, active, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str, alliance_str, username, rank, level, notes, active, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── DuelStore impl ──────────────────────────────────────────────────────────

impl DuelStore for SqliteStore {
  type Error = Error;

  // ── Alliances ─────────────────────────────────────────────────────────────

  async fn create_alliance(&self, input: NewAlliance) -> Result<Alliance> {
    validate_tag(&input.tag).map_err(Error::Domain)?;

    if self.get_alliance_by_tag(&input.tag).await?.is_some() {
      return Err(Error::Domain(duelboard_core::Error::DuplicateTag(input.tag)));
    }

    let alliance = Alliance {
      alliance_id: Uuid::new_v4(),
      name:        input.name,
      tag:         input.tag,
      created_at:  Utc::now(),
    };

    let id_str   = encode_uuid(alliance.alliance_id);
    let name     = alliance.name.clone();
    let tag      = alliance.tag.clone();
    let at_str   = encode_dt(alliance.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO alliances (alliance_id, name, tag, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, tag, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(alliance)
  }

  async fn get_alliance_by_tag(&self, tag: &str) -> Result<Option<Alliance>> {
    let tag = tag.to_owned();

    let raw: Option<RawAlliance> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            // tag is COLLATE NOCASE, so equality matches case-insensitively.
            "SELECT alliance_id, name, tag, created_at
             FROM alliances WHERE tag = ?1",
            rusqlite::params![tag],
            |row| {
              Ok(RawAlliance {
                alliance_id: row.get(0)?,
                name:        row.get(1)?,
                tag:         row.get(2)?,
                created_at:  row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAlliance::into_alliance).transpose()
  }

  // ── Players ───────────────────────────────────────────────────────────────

  async fn add_player(&self, input: NewPlayer) -> Result<Player> {
    if self
      .username_taken(input.alliance_id, &input.username, None)
      .await?
    {
      return Err(Error::Domain(duelboard_core::Error::DuplicateUsername(
        input.username,
      )));
    }

    let player = Player {
      player_id:   Uuid::new_v4(),
      alliance_id: input.alliance_id,
      username:    input.username,
      rank:        input.rank,
      level:       input.level,
      active:      true,
      notes:       input.notes,
      created_at:  Utc::now(),
    };

    self.persist_player(&player).await?;
    Ok(player)
  }

  async fn list_players(&self, alliance_id: Uuid) -> Result<Vec<Player>> {
    let alliance_str = encode_uuid(alliance_id);

    let raws: Vec<RawPlayer> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT player_id, alliance_id, username, rank, level, notes, active, created_at
           FROM players WHERE alliance_id = ?1
           ORDER BY username",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![alliance_str], |row| {
            Ok(RawPlayer {
              player_id:   row.get(0)?,
              alliance_id: row.get(1)?,
              username:    row.get(2)?,
              rank:        row.get(3)?,
              level:       row.get(4)?,
              notes:       row.get(5)?,
              active:      row.get(6)?,
              created_at:  row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPlayer::into_player).collect()
  }

  async fn update_player(&self, player_id: Uuid, update: PlayerUpdate) -> Result<Player> {
    let mut player = self
      .fetch_player(player_id)
      .await?
      .ok_or(Error::Domain(duelboard_core::Error::PlayerNotFound(player_id)))?;

    if let Some(username) = update.username {
      if self
        .username_taken(player.alliance_id, &username, Some(player_id))
        .await?
      {
        return Err(Error::Domain(duelboard_core::Error::DuplicateUsername(
          username,
        )));
      }
      player.username = username;
    }
    if let Some(rank) = update.rank {
      player.rank = rank;
    }
    if let Some(level) = update.level {
      player.level = duelboard_core::alliance::validate_level(level as i64)?;
    }
    if let Some(notes) = update.notes {
      player.notes = Some(notes);
    }

    let id_str   = encode_uuid(player_id);
    let username = player.username.clone();
    let rank     = player.rank.as_str().to_owned();
    let level    = player.level as i64;
    let notes    = player.notes.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE players SET username = ?2, rank = ?3, level = ?4, notes = ?5
           WHERE player_id = ?1",
          rusqlite::params![id_str, username, rank, level, notes],
        )?;
        Ok(())
      })
      .await?;

    Ok(player)
  }

  async fn toggle_player_active(&self, player_id: Uuid) -> Result<Player> {
    let mut player = self
      .fetch_player(player_id)
      .await?
      .ok_or(Error::Domain(duelboard_core::Error::PlayerNotFound(player_id)))?;

    player.active = !player.active;

    let id_str = encode_uuid(player_id);
    let active = player.active;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE players SET active = ?2 WHERE player_id = ?1",
          rusqlite::params![id_str, active],
        )?;
        Ok(())
      })
      .await?;

    Ok(player)
  }

  async fn delete_player(&self, player_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(player_id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM players WHERE player_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(Error::Domain(duelboard_core::Error::PlayerNotFound(player_id)));
    }
    Ok(())
  }

  // ── Duels ─────────────────────────────────────────────────────────────────

  async fn create_duel(
    &self,
    alliance_id: Uuid,
    start_date: NaiveDate,
  ) -> Result<(Duel, Vec<Day>)> {
    let now = Utc::now();
    let duel = Duel {
      duel_id: Uuid::new_v4(),
      alliance_id,
      start_date,
      created_at: now,
    };

    let days: Vec<Day> = DEFAULT_DAYS
      .iter()
      .map(|(number, name)| Day {
        day_id:          Uuid::new_v4(),
        duel_id:         duel.duel_id,
        day_number:      *number,
        name:            (*name).to_owned(),
        score_goal:      DEFAULT_SCORE_GOAL,
        lock:            LockState::Open,
        lock_changed_at: now,
      })
      .collect();

    let duel_id_str  = encode_uuid(duel.duel_id);
    let alliance_str = encode_uuid(alliance_id);
    let date_str     = encode_date(start_date);
    let at_str       = encode_dt(now);
    let day_rows: Vec<(String, i64, String, f64, String)> = days
      .iter()
      .map(|d| {
        (
          encode_uuid(d.day_id),
          d.day_number as i64,
          d.name.clone(),
          d.score_goal,
          encode_dt(d.lock_changed_at),
        )
      })
      .collect();

    // The duel and its six days land atomically or not at all.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO duels (duel_id, alliance_id, start_date, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![duel_id_str, alliance_str, date_str, at_str],
        )?;
        for (day_id, number, name, goal, changed_at) in &day_rows {
          tx.execute(
            "INSERT INTO days
               (day_id, duel_id, day_number, name, score_goal, locked, lock_changed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            rusqlite::params![day_id, duel_id_str, number, name, goal, changed_at],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok((duel, days))
  }

  async fn list_duels(&self, alliance_id: Uuid) -> Result<Vec<Duel>> {
    let alliance_str = encode_uuid(alliance_id);

    let raws: Vec<RawDuel> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT duel_id, alliance_id, start_date, created_at
           FROM duels WHERE alliance_id = ?1
           ORDER BY start_date DESC, duel_id DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![alliance_str], |row| {
            Ok(RawDuel {
              duel_id:     row.get(0)?,
              alliance_id: row.get(1)?,
              start_date:  row.get(2)?,
              created_at:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDuel::into_duel).collect()
  }

  async fn get_duel(&self, duel_id: Uuid) -> Result<Option<Duel>> {
    let id_str = encode_uuid(duel_id);

    let raw: Option<RawDuel> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT duel_id, alliance_id, start_date, created_at
             FROM duels WHERE duel_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawDuel {
                duel_id:     row.get(0)?,
                alliance_id: row.get(1)?,
                start_date:  row.get(2)?,
                created_at:  row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawDuel::into_duel).transpose()
  }

  async fn delete_duel(&self, duel_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(duel_id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM duels WHERE duel_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(Error::Domain(duelboard_core::Error::DuelNotFound(duel_id)));
    }
    Ok(())
  }

  // ── Days ──────────────────────────────────────────────────────────────────

  async fn list_days(&self, duel_id: Uuid) -> Result<Vec<Day>> {
    let duel_str = encode_uuid(duel_id);

    let raws: Vec<RawDay> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT day_id, duel_id, day_number, name, score_goal, locked, lock_changed_at
           FROM days WHERE duel_id = ?1
           ORDER BY day_number",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![duel_str], |row| {
            Ok(RawDay {
              day_id:          row.get(0)?,
              duel_id:         row.get(1)?,
              day_number:      row.get(2)?,
              name:            row.get(3)?,
              score_goal:      row.get(4)?,
              locked:          row.get(5)?,
              lock_changed_at: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDay::into_day).collect()
  }

  async fn get_day(&self, day_id: Uuid) -> Result<Option<Day>> {
    let id_str = encode_uuid(day_id);

    let raw: Option<RawDay> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT day_id, duel_id, day_number, name, score_goal, locked, lock_changed_at
             FROM days WHERE day_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawDay {
                day_id:          row.get(0)?,
                duel_id:         row.get(1)?,
                day_number:      row.get(2)?,
                name:            row.get(3)?,
                score_goal:      row.get(4)?,
                locked:          row.get(5)?,
                lock_changed_at: row.get(6)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawDay::into_day).transpose()
  }

  async fn toggle_day_lock(&self, day_id: Uuid) -> Result<Day> {
    let mut day = self
      .get_day(day_id)
      .await?
      .ok_or(Error::Domain(duelboard_core::Error::DayNotFound(day_id)))?;

    day.lock = day.lock.toggle();
    day.lock_changed_at = Utc::now();

    let id_str = encode_uuid(day_id);
    let locked = day.lock.is_locked();
    let at_str = encode_dt(day.lock_changed_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE days SET locked = ?2, lock_changed_at = ?3 WHERE day_id = ?1",
          rusqlite::params![id_str, locked, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(day)
  }

  async fn set_day_goal(&self, day_id: Uuid, goal: f64) -> Result<Day> {
    let goal = validate_goal(goal).map_err(Error::Domain)?;

    let mut day = self
      .get_day(day_id)
      .await?
      .ok_or(Error::Domain(duelboard_core::Error::DayNotFound(day_id)))?;

    // Goal edits are allowed on locked days; the lock gates scores only.
    day.score_goal = goal;

    let id_str = encode_uuid(day_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE days SET score_goal = ?2 WHERE day_id = ?1",
          rusqlite::params![id_str, goal],
        )?;
        Ok(())
      })
      .await?;

    Ok(day)
  }

  // ── Scores ────────────────────────────────────────────────────────────────

  async fn submit_score(
    &self,
    duel_id: Uuid,
    day_id: Uuid,
    player_id: Uuid,
    value: Option<f64>,
  ) -> Result<SubmitOutcome> {
    let duel = self
      .get_duel(duel_id)
      .await?
      .ok_or(Error::Domain(duelboard_core::Error::DuelNotFound(duel_id)))?;

    let day = self
      .get_day(day_id)
      .await?
      .filter(|d| d.duel_id == duel_id)
      .ok_or(Error::Domain(duelboard_core::Error::DayNotFound(day_id)))?;

    let player = self
      .fetch_player(player_id)
      .await?
      .filter(|p| p.alliance_id == duel.alliance_id)
      .ok_or(Error::Domain(duelboard_core::Error::PlayerNotFound(player_id)))?;

    if day.lock.is_locked() {
      return Err(Error::Domain(duelboard_core::Error::DayLocked(day_id)));
    }

    let score_id_str = encode_uuid(Uuid::new_v4());
    let day_str      = encode_uuid(day_id);
    let player_str   = encode_uuid(player.player_id);
    let duel_str     = encode_uuid(duel_id);

    let total: f64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO scores (score_id, day_id, player_id, score)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (day_id, player_id) DO UPDATE SET score = excluded.score",
          rusqlite::params![score_id_str, day_str, player_str, value],
        )?;

        // Running total over every day of the duel; null scores count as 0.
        let total: f64 = conn.query_row(
          "SELECT COALESCE(SUM(COALESCE(s.score, 0)), 0)
           FROM days d
           LEFT JOIN scores s ON s.day_id = d.day_id AND s.player_id = ?2
           WHERE d.duel_id = ?1",
          rusqlite::params![duel_str, player_str],
          |row| row.get(0),
        )?;

        Ok(total)
      })
      .await?;

    Ok(SubmitOutcome { score: value, total: round1(total) })
  }

  async fn scores_for_duel(&self, duel_id: Uuid) -> Result<ScoreBook> {
    let duel_str = encode_uuid(duel_id);

    let rows: Vec<(String, String, Option<f64>)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT s.player_id, s.day_id, s.score
           FROM scores s
           JOIN days d ON d.day_id = s.day_id
           WHERE d.duel_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![duel_str], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut book = ScoreBook::new();
    for (player_str, day_str, value) in rows {
      book.put(
        crate::encode::decode_uuid(&player_str)?,
        crate::encode::decode_uuid(&day_str)?,
        value,
      );
    }
    Ok(book)
  }

  async fn get_score(&self, day_id: Uuid, player_id: Uuid) -> Result<Option<Score>> {
    let day_str    = encode_uuid(day_id);
    let player_str = encode_uuid(player_id);

    let raw: Option<RawScore> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT score_id, day_id, player_id, score
             FROM scores WHERE day_id = ?1 AND player_id = ?2",
            rusqlite::params![day_str, player_str],
            |row| {
              Ok(RawScore {
                score_id:  row.get(0)?,
                day_id:    row.get(1)?,
                player_id: row.get(2)?,
                score:     row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawScore::into_score).transpose()
  }
}
