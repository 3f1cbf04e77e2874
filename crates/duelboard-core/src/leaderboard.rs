//! Scope selection and the public leaderboard view.
//!
//! Selection is deterministic: ties on `start_date` or `lock_changed_at` are
//! broken by id descending, rather than relying on incidental storage order.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  alliance::{Alliance, Player},
  duel::{Day, Duel},
  score::ScoreBook,
  stats::{
    self, DailyStanding, GoalStats, NaughtyEntry, WeeklyStanding,
  },
};

/// Shown for every section while no day of the current duel is locked.
pub const PENDING_MESSAGE: &str = "No data to display until a day is locked";

// ─── Scope selection ─────────────────────────────────────────────────────────

/// The duel with the maximum `start_date`; ties broken by id descending.
pub fn current_duel(duels: &[Duel]) -> Option<&Duel> {
  duels.iter().max_by_key(|d| (d.start_date, d.duel_id))
}

/// Among locked days, the one whose lock state changed most recently; ties
/// broken by id descending.
pub fn latest_locked_day<'a, I>(days: I) -> Option<&'a Day>
where
  I: IntoIterator<Item = &'a Day>,
{
  days
    .into_iter()
    .filter(|d| d.lock.is_locked())
    .max_by_key(|d| (d.lock_changed_at, d.day_id))
}

// ─── View types ──────────────────────────────────────────────────────────────

/// Which duel and day the ready leaderboard describes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardHeader {
  pub start_date: NaiveDate,
  pub day_number: u8,
  pub day_name:   String,
  pub score_goal: f64,
}

/// The data half of a leaderboard: either an explicit "nothing locked yet"
/// marker, or the full set of sections. `Pending` is not the same as a ready
/// board full of zeros — it means the event has no reportable day at all.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LeaderboardBody {
  Pending {
    message: &'static str,
  },
  Ready {
    header:        LeaderboardHeader,
    made_goal:     GoalStats,
    missed_goal:   usize,
    average_score: f64,
    top_daily:     Vec<DailyStanding>,
    top_weekly:    Vec<WeeklyStanding>,
    below_goal:    Vec<DailyStanding>,
    naughty_list:  Vec<NaughtyEntry>,
  },
}

impl LeaderboardBody {
  pub fn pending() -> Self {
    LeaderboardBody::Pending { message: PENDING_MESSAGE }
  }

  pub fn is_pending(&self) -> bool {
    matches!(self, LeaderboardBody::Pending { .. })
  }
}

/// The public leaderboard for one alliance.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardView {
  pub alliance_name: String,
  pub alliance_tag:  String,
  #[serde(flatten)]
  pub body:          LeaderboardBody,
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Assemble the leaderboard from a loaded snapshot.
///
/// `duels` is the alliance's full duel list; `days` and `book` cover the
/// current duel (extra days from other duels are ignored). With no duel, or
/// no locked day on the current one, the body is `Pending`.
pub fn build_leaderboard(
  alliance: &Alliance,
  players: &[Player],
  duels: &[Duel],
  days: &[Day],
  book: &ScoreBook,
) -> LeaderboardView {
  let body = match current_duel(duels) {
    None => LeaderboardBody::pending(),
    Some(duel) => {
      let duel_days: Vec<&Day> =
        days.iter().filter(|d| d.duel_id == duel.duel_id).collect();
      let locked: Vec<&Day> =
        duel_days.iter().copied().filter(|d| d.lock.is_locked()).collect();

      match latest_locked_day(duel_days.iter().copied()) {
        None => LeaderboardBody::pending(),
        Some(target) => LeaderboardBody::Ready {
          header:        LeaderboardHeader {
            start_date: duel.start_date,
            day_number: target.day_number,
            day_name:   target.name.clone(),
            score_goal: target.score_goal,
          },
          made_goal:     stats::made_goal_stats(players, target, book),
          missed_goal:   stats::missed_goal_count(players, target, book),
          average_score: stats::average_score(players, target, book),
          top_daily:     stats::top_daily_performers(players, target, book),
          top_weekly:    stats::top_weekly_performers(players, &locked, book),
          below_goal:    stats::players_below_goal(players, target, book),
          naughty_list:  stats::naughty_list(players, &locked, book),
        },
      }
    }
  };

  LeaderboardView {
    alliance_name: alliance.name.clone(),
    alliance_tag:  alliance.tag.clone(),
    body,
  }
}
