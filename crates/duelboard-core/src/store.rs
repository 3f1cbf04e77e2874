//! The `DuelStore` trait.
//!
//! Implemented by storage backends (e.g. `duelboard-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on any concrete backend.
//!
//! The associated error must convert into [`crate::Error`] so callers can
//! classify failures (validation / state / not-found / storage) and pick a
//! transport status without knowing the backend.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  alliance::{Alliance, NewAlliance, NewPlayer, Player, PlayerUpdate},
  duel::{Day, Duel},
  score::{Score, ScoreBook},
};

/// Outcome of a score submission: the stored value and the player's new
/// running total across every day of the duel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmitOutcome {
  pub score: Option<f64>,
  pub total: f64,
}

/// Abstraction over a duel scoring store backend.
///
/// Each method is an independent, short-lived unit — there is no cross-call
/// coordination, and same-key writes race under last-write-wins.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DuelStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Alliances ─────────────────────────────────────────────────────────

  /// Create an alliance after validating its tag; fails on a duplicate tag.
  fn create_alliance(
    &self,
    input: NewAlliance,
  ) -> impl Future<Output = Result<Alliance, Self::Error>> + Send + '_;

  /// Look up an alliance by exact tag, case-insensitively.
  fn get_alliance_by_tag<'a>(
    &'a self,
    tag: &'a str,
  ) -> impl Future<Output = Result<Option<Alliance>, Self::Error>> + Send + 'a;

  // ── Players ───────────────────────────────────────────────────────────

  /// Add a roster member; fails if the username is taken in the alliance.
  fn add_player(
    &self,
    input: NewPlayer,
  ) -> impl Future<Output = Result<Player, Self::Error>> + Send + '_;

  /// All players of an alliance, ordered by lowercase username.
  fn list_players(
    &self,
    alliance_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Player>, Self::Error>> + Send + '_;

  fn update_player(
    &self,
    player_id: Uuid,
    update: PlayerUpdate,
  ) -> impl Future<Output = Result<Player, Self::Error>> + Send + '_;

  /// Flip the `active` flag and return the updated player.
  fn toggle_player_active(
    &self,
    player_id: Uuid,
  ) -> impl Future<Output = Result<Player, Self::Error>> + Send + '_;

  /// Remove a player; their scores go with them.
  fn delete_player(
    &self,
    player_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Duels ─────────────────────────────────────────────────────────────

  /// Create a duel and seed its six fixed days in one atomic step.
  fn create_duel(
    &self,
    alliance_id: Uuid,
    start_date: NaiveDate,
  ) -> impl Future<Output = Result<(Duel, Vec<Day>), Self::Error>> + Send + '_;

  /// All duels of an alliance, newest `start_date` first.
  fn list_duels(
    &self,
    alliance_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Duel>, Self::Error>> + Send + '_;

  fn get_duel(
    &self,
    duel_id: Uuid,
  ) -> impl Future<Output = Result<Option<Duel>, Self::Error>> + Send + '_;

  /// Delete a duel; cascades to its days and their scores.
  fn delete_duel(
    &self,
    duel_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Days ──────────────────────────────────────────────────────────────

  /// A duel's days ordered by day number.
  fn list_days(
    &self,
    duel_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Day>, Self::Error>> + Send + '_;

  fn get_day(
    &self,
    day_id: Uuid,
  ) -> impl Future<Output = Result<Option<Day>, Self::Error>> + Send + '_;

  /// Flip the day's lock and stamp the change time.
  fn toggle_day_lock(
    &self,
    day_id: Uuid,
  ) -> impl Future<Output = Result<Day, Self::Error>> + Send + '_;

  /// Update the goal; allowed whether or not the day is locked.
  fn set_day_goal(
    &self,
    day_id: Uuid,
    goal: f64,
  ) -> impl Future<Output = Result<Day, Self::Error>> + Send + '_;

  // ── Scores ────────────────────────────────────────────────────────────

  /// Upsert the (player, day) score for an open day of `duel_id` and return
  /// the stored value plus the player's recomputed duel total. Fails with a
  /// state error if the day is locked, leaving the stored value unchanged.
  fn submit_score(
    &self,
    duel_id: Uuid,
    day_id: Uuid,
    player_id: Uuid,
    value: Option<f64>,
  ) -> impl Future<Output = Result<SubmitOutcome, Self::Error>> + Send + '_;

  /// Every score attached to the duel's days, as a [`ScoreBook`].
  fn scores_for_duel(
    &self,
    duel_id: Uuid,
  ) -> impl Future<Output = Result<ScoreBook, Self::Error>> + Send + '_;

  /// The stored record for (day, player), if one exists.
  fn get_score(
    &self,
    day_id: Uuid,
    player_id: Uuid,
  ) -> impl Future<Output = Result<Option<Score>, Self::Error>> + Send + '_;
}
