//! The aggregation engine: pure functions over a roster, a duel's days, and a
//! [`ScoreBook`].
//!
//! Every function restricts itself to active players — inactive players never
//! appear in any output, whatever scores they hold. Nothing here performs
//! I/O; callers load a snapshot and hand it in.

use serde::Serialize;
use uuid::Uuid;

use crate::{
  alliance::{Player, Rank},
  duel::Day,
  score::{ScoreBook, round1},
};

/// Leaderboard tables are capped at ten rows.
pub const TOP_LIMIT: usize = 10;

/// Minimum locked-day misses before a player lands on the naughty list.
pub const NAUGHTY_THRESHOLD: usize = 3;

// ─── Result rows ─────────────────────────────────────────────────────────────

/// Made-goal summary for one day. `total` is the count of all active players,
/// not only those who submitted a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalStats {
  pub count: usize,
  pub total: usize,
  pub pct:   f64,
}

/// One row of a single-day table (top performers or below-goal list).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStanding {
  pub player_id: Uuid,
  pub username:  String,
  pub rank:      Rank,
  pub level:     u8,
  pub score:     f64,
}

/// One row of the weekly table: sum of a player's non-null scores across the
/// locked days of the duel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyStanding {
  pub player_id: Uuid,
  pub username:  String,
  pub rank:      Rank,
  pub level:     u8,
  pub total:     f64,
}

/// One row of the repeat-offender list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NaughtyEntry {
  pub player_id:    Uuid,
  pub username:     String,
  pub missed_count: usize,
  pub missed_pct:   f64,
}

fn active(players: &[Player]) -> impl Iterator<Item = &Player> {
  players.iter().filter(|p| p.active)
}

// ─── Single-day statistics ───────────────────────────────────────────────────

/// Count and percentage of active players whose non-null score on `day` met
/// its goal. The denominator is the whole active roster.
pub fn made_goal_stats(players: &[Player], day: &Day, book: &ScoreBook) -> GoalStats {
  let total = active(players).count();
  if total == 0 {
    return GoalStats { count: 0, total: 0, pct: 0.0 };
  }

  let count = active(players)
    .filter(|p| {
      matches!(book.get(p.player_id, day.day_id), Some(s) if s >= day.score_goal)
    })
    .count();

  GoalStats {
    count,
    total,
    pct: round1(count as f64 / total as f64 * 100.0),
  }
}

/// Active players with a non-null score strictly below the day's goal.
pub fn missed_goal_count(players: &[Player], day: &Day, book: &ScoreBook) -> usize {
  active(players)
    .filter(|p| {
      matches!(book.get(p.player_id, day.day_id), Some(s) if s < day.score_goal)
    })
    .count()
}

/// Mean of non-null active-player scores on `day`, rounded to one decimal;
/// `0.0` when nobody submitted a score.
pub fn average_score(players: &[Player], day: &Day, book: &ScoreBook) -> f64 {
  let scores: Vec<f64> = active(players)
    .filter_map(|p| book.get(p.player_id, day.day_id))
    .collect();
  if scores.is_empty() {
    return 0.0;
  }
  round1(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Active players with a non-null score on `day`, score descending, capped at
/// [`TOP_LIMIT`]. The sort is stable, so equal scores keep roster order.
pub fn top_daily_performers(
  players: &[Player],
  day: &Day,
  book: &ScoreBook,
) -> Vec<DailyStanding> {
  let mut rows: Vec<DailyStanding> = active(players)
    .filter_map(|p| {
      book.get(p.player_id, day.day_id).map(|score| DailyStanding {
        player_id: p.player_id,
        username:  p.username.clone(),
        rank:      p.rank,
        level:     p.level,
        score,
      })
    })
    .collect();
  rows.sort_by(|a, b| b.score.total_cmp(&a.score));
  rows.truncate(TOP_LIMIT);
  rows
}

/// Active players with a non-null score below the goal on `day`, score
/// ascending (worst first).
pub fn players_below_goal(
  players: &[Player],
  day: &Day,
  book: &ScoreBook,
) -> Vec<DailyStanding> {
  let mut rows: Vec<DailyStanding> = active(players)
    .filter_map(|p| {
      book
        .get(p.player_id, day.day_id)
        .filter(|s| *s < day.score_goal)
        .map(|score| DailyStanding {
          player_id: p.player_id,
          username:  p.username.clone(),
          rank:      p.rank,
          level:     p.level,
          score,
        })
    })
    .collect();
  rows.sort_by(|a, b| a.score.total_cmp(&b.score));
  rows
}

// ─── Multi-day statistics ────────────────────────────────────────────────────

/// Per-player totals across `locked_days`, sum descending, capped at
/// [`TOP_LIMIT`]. A player with no non-null score on any locked day is absent
/// from the table, not listed with 0.
pub fn top_weekly_performers(
  players: &[Player],
  locked_days: &[&Day],
  book: &ScoreBook,
) -> Vec<WeeklyStanding> {
  let mut rows: Vec<WeeklyStanding> = active(players)
    .filter_map(|p| {
      let mut sum = 0.0;
      let mut scored = false;
      for day in locked_days {
        if let Some(s) = book.get(p.player_id, day.day_id) {
          sum += s;
          scored = true;
        }
      }
      scored.then(|| WeeklyStanding {
        player_id: p.player_id,
        username:  p.username.clone(),
        rank:      p.rank,
        level:     p.level,
        total:     round1(sum),
      })
    })
    .collect();
  rows.sort_by(|a, b| b.total.total_cmp(&a.total));
  rows.truncate(TOP_LIMIT);
  rows
}

/// Active players who missed the goal (non-null score below that day's own
/// goal) on at least [`NAUGHTY_THRESHOLD`] locked days, sorted by miss count
/// descending. Days without a submitted score never count as misses.
pub fn naughty_list(
  players: &[Player],
  locked_days: &[&Day],
  book: &ScoreBook,
) -> Vec<NaughtyEntry> {
  if locked_days.is_empty() {
    return Vec::new();
  }

  let mut rows: Vec<NaughtyEntry> = active(players)
    .filter_map(|p| {
      let missed_count = locked_days
        .iter()
        .filter(|day| {
          matches!(book.get(p.player_id, day.day_id), Some(s) if s < day.score_goal)
        })
        .count();
      (missed_count >= NAUGHTY_THRESHOLD).then(|| NaughtyEntry {
        player_id:    p.player_id,
        username:     p.username.clone(),
        missed_count,
        missed_pct:   round1(missed_count as f64 / locked_days.len() as f64 * 100.0),
      })
    })
    .collect();
  rows.sort_by(|a, b| b.missed_count.cmp(&a.missed_count));
  rows
}
