//! JSON HTTP API for Duelboard.
//!
//! Exposes an axum [`Router`] backed by any [`duelboard_core::store::DuelStore`].
//! The public leaderboard is unauthenticated; every other route requires the
//! admin Basic-auth credential.

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, patch, post},
};
use duelboard_core::store::DuelStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub admin_username:      String,
  pub admin_password_hash: String,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: DuelStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DuelStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Public leaderboard
    .route("/alliances/{tag}", get(handlers::leaderboard::show::<S>))
    // Alliances
    .route("/alliances", post(handlers::alliances::create::<S>))
    // Roster
    .route(
      "/players",
      get(handlers::players::list::<S>).post(handlers::players::create::<S>),
    )
    .route(
      "/players/{player_id}",
      patch(handlers::players::update::<S>)
        .delete(handlers::players::remove::<S>),
    )
    .route(
      "/players/{player_id}/toggle-active",
      patch(handlers::players::toggle_active::<S>),
    )
    // Duels
    .route(
      "/duels",
      get(handlers::duels::list::<S>).post(handlers::duels::create::<S>),
    )
    .route("/duels/{duel_id}", delete(handlers::duels::remove::<S>))
    .route("/duels/{duel_id}/days", get(handlers::duels::days::<S>))
    .route(
      "/duels/{duel_id}/days/{day_id}/scores",
      post(handlers::scores::submit::<S>),
    )
    // Days
    .route("/days/{day_id}/lock", patch(handlers::days::toggle_lock::<S>))
    .route("/days/{day_id}/goal", patch(handlers::days::set_goal::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Test support ────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) async fn test_state(
  password: &str,
) -> AppState<duelboard_store_sqlite::SqliteStore> {
  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use rand_core::OsRng;

  let store = duelboard_store_sqlite::SqliteStore::open_in_memory()
    .await
    .unwrap();
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .unwrap()
    .to_string();

  AppState {
    store: Arc::new(store),
    auth:  Arc::new(AuthConfig {
      username:      "admin".to_string(),
      password_hash: hash,
    }),
  }
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use chrono::NaiveDate;
  use duelboard_core::{
    alliance::{Alliance, NewAlliance, NewPlayer, Player, Rank},
    duel::{Day, Duel},
    store::DuelStore as _,
  };
  use duelboard_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  type TestState = AppState<SqliteStore>;

  fn auth_header() -> String {
    format!("Basic {}", B64.encode("admin:secret"))
  }

  async fn send(
    state: &TestState,
    method: &str,
    uri: &str,
    authed: bool,
    body: Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if authed {
      builder = builder.header(header::AUTHORIZATION, auth_header());
    }
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    router(state.clone()).oneshot(req).await.unwrap()
  }

  async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
  }

  // Seed helpers go straight to the store; the HTTP surface is exercised by
  // the assertions themselves.

  async fn seed_alliance(state: &TestState) -> Alliance {
    state
      .store
      .create_alliance(NewAlliance {
        name: "Test Alliance".into(),
        tag:  "TEST".into(),
      })
      .await
      .unwrap()
  }

  async fn seed_player(
    state: &TestState,
    alliance: &Alliance,
    username: &str,
  ) -> Player {
    state
      .store
      .add_player(NewPlayer {
        alliance_id: alliance.alliance_id,
        username:    username.into(),
        rank:        Rank::R1,
        level:       30,
        notes:       None,
      })
      .await
      .unwrap()
  }

  async fn seed_duel(state: &TestState, alliance: &Alliance) -> (Duel, Vec<Day>) {
    state
      .store
      .create_duel(alliance.alliance_id, date("2026-08-08"))
      .await
      .unwrap()
  }

  fn score_body(player: &Player, score: Value) -> Value {
    json!({ "playerId": player.player_id, "score": score })
  }

  // ── Alliances ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_alliance_returns_201() {
    let state = test_state("secret").await;
    let resp = send(
      &state,
      "POST",
      "/alliances",
      true,
      Some(json!({ "name": "Test Alliance", "tag": "TEST" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["tag"], "TEST");
    assert_eq!(body["name"], "Test Alliance");
  }

  #[tokio::test]
  async fn invalid_and_duplicate_tags_return_422() {
    let state = test_state("secret").await;
    seed_alliance(&state).await;

    let resp = send(
      &state,
      "POST",
      "/alliances",
      true,
      Some(json!({ "name": "Bad", "tag": "toolong" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Duplicate check is case-insensitive.
    let resp = send(
      &state,
      "POST",
      "/alliances",
      true,
      Some(json!({ "name": "Copy", "tag": "test" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  }

  // ── Auth ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_routes_require_basic_auth() {
    let state = test_state("secret").await;
    let resp = send(
      &state,
      "POST",
      "/alliances",
      false,
      Some(json!({ "name": "Test Alliance", "tag": "TEST" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn leaderboard_is_public() {
    let state = test_state("secret").await;
    seed_alliance(&state).await;
    let resp = send(&state, "GET", "/alliances/TEST", false, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  // ── Leaderboard ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn leaderboard_tag_lookup_is_case_insensitive() {
    let state = test_state("secret").await;
    seed_alliance(&state).await;

    for tag in ["TEST", "test", "TeSt"] {
      let resp =
        send(&state, "GET", &format!("/alliances/{tag}"), false, None).await;
      assert_eq!(resp.status(), StatusCode::OK, "tag {tag}");
      let body = body_json(resp).await;
      assert_eq!(body["alliance_tag"], "TEST");
    }
  }

  #[tokio::test]
  async fn unknown_or_malformed_tag_is_404() {
    let state = test_state("secret").await;

    let resp = send(&state, "GET", "/alliances/ZZZZ", false, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Alliance not found");

    // A tag that could never exist is rejected without a JSON body.
    let resp = send(&state, "GET", "/alliances/toolong", false, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn leaderboard_is_pending_until_a_day_is_locked() {
    let state = test_state("secret").await;
    let alliance = seed_alliance(&state).await;
    seed_player(&state, &alliance, "alice").await;
    seed_duel(&state, &alliance).await;

    let resp = send(&state, "GET", "/alliances/TEST", false, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["message"], "No data to display until a day is locked");
    assert_eq!(body["alliance_name"], "Test Alliance");
  }

  #[tokio::test]
  async fn leaderboard_aggregates_the_latest_locked_day() {
    let state = test_state("secret").await;
    let alliance = seed_alliance(&state).await;
    let (duel, days) = seed_duel(&state, &alliance).await;
    let target = &days[0];

    let alice = seed_player(&state, &alliance, "alice").await;
    let bob = seed_player(&state, &alliance, "bob").await;
    let carol = seed_player(&state, &alliance, "carol").await;
    let dave = seed_player(&state, &alliance, "dave").await;
    let erin = seed_player(&state, &alliance, "erin").await;
    let frank = seed_player(&state, &alliance, "frank").await;
    state.store.toggle_player_active(frank.player_id).await.unwrap();

    // Goal 100; active scores 120, 100, 90, 0, NA. The inactive player's 999
    // must not leak into any section.
    let resp = send(
      &state,
      "PATCH",
      &format!("/days/{}/goal", target.day_id),
      true,
      Some(json!({ "score_goal": 100.0 })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let submit_uri =
      format!("/duels/{}/days/{}/scores", duel.duel_id, target.day_id);
    for (player, score) in [
      (&alice, json!(120.0)),
      (&bob, json!(100.0)),
      (&carol, json!(90.0)),
      (&dave, json!(0.0)),
      (&erin, json!("NA")),
      (&frank, json!(999.0)),
    ] {
      let resp =
        send(&state, "POST", &submit_uri, true, Some(score_body(player, score)))
          .await;
      assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = send(
      &state,
      "PATCH",
      &format!("/days/{}/lock", target.day_id),
      true,
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&state, "GET", "/alliances/TEST", false, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;

    assert_eq!(body["status"], "ready");
    assert_eq!(body["header"]["day_number"], 1);
    assert_eq!(body["header"]["score_goal"], 100.0);
    assert_eq!(body["made_goal"], json!({ "count": 2, "total": 5, "pct": 40.0 }));
    assert_eq!(body["missed_goal"], 2);
    assert_eq!(body["average_score"], 77.5);

    let top_daily = body["top_daily"].as_array().unwrap();
    assert_eq!(top_daily.len(), 4);
    assert_eq!(top_daily[0]["username"], "alice");
    assert_eq!(top_daily[0]["score"], 120.0);

    let below = body["below_goal"].as_array().unwrap();
    assert_eq!(below.len(), 2);
    assert_eq!(below[0]["score"], 0.0);

    // One locked day cannot put anyone past the miss threshold.
    assert_eq!(body["naughty_list"].as_array().unwrap().len(), 0);

    let top_weekly = body["top_weekly"].as_array().unwrap();
    assert_eq!(top_weekly[0]["username"], "alice");
    assert_eq!(top_weekly[0]["total"], 120.0);
  }

  // ── Duels ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_duel_requires_a_start_date() {
    let state = test_state("secret").await;
    let alliance = seed_alliance(&state).await;

    let resp = send(
      &state,
      "POST",
      "/duels",
      true,
      Some(json!({ "allianceId": alliance.alliance_id })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "start date is required");
  }

  #[tokio::test]
  async fn create_duel_seeds_six_days() {
    let state = test_state("secret").await;
    let alliance = seed_alliance(&state).await;

    let resp = send(
      &state,
      "POST",
      "/duels",
      true,
      Some(json!({
        "allianceId": alliance.alliance_id,
        "startDate":  "2026-08-08",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["duel"]["start_date"], "2026-08-08");
    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 6);
    assert_eq!(days[0]["name"], "Radar Training");
    assert_eq!(days[0]["lock"], "open");
  }

  #[tokio::test]
  async fn list_days_of_unknown_duel_is_404() {
    let state = test_state("secret").await;
    let resp = send(
      &state,
      "GET",
      &format!("/duels/{}/days", Uuid::new_v4()),
      true,
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Duel not found");
  }

  #[tokio::test]
  async fn delete_duel_returns_204_then_404() {
    let state = test_state("secret").await;
    let alliance = seed_alliance(&state).await;
    let (duel, _) = seed_duel(&state, &alliance).await;

    let uri = format!("/duels/{}", duel.duel_id);
    let resp = send(&state, "DELETE", &uri, true, None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&state, "DELETE", &uri, true, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Scores ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn score_submission_round_trips() {
    let state = test_state("secret").await;
    let alliance = seed_alliance(&state).await;
    let player = seed_player(&state, &alliance, "alice").await;
    let (duel, days) = seed_duel(&state, &alliance).await;
    let uri = format!("/duels/{}/days/{}/scores", duel.duel_id, days[0].day_id);

    let resp = send(
      &state,
      "POST",
      &uri,
      true,
      Some(score_body(&player, json!(100.0))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body, json!({ "success": true, "total": 100.0, "score": 100.0 }));

    // "NA" resets the day; numeric text is accepted.
    let resp = send(
      &state,
      "POST",
      &uri,
      true,
      Some(score_body(&player, json!("NA"))),
    )
    .await;
    let body = body_json(resp).await;
    assert_eq!(body, json!({ "success": true, "total": 0.0, "score": "NA" }));

    let resp = send(
      &state,
      "POST",
      &uri,
      true,
      Some(score_body(&player, json!("17"))),
    )
    .await;
    let body = body_json(resp).await;
    assert_eq!(body["total"], 17.0);
  }

  #[tokio::test]
  async fn locked_day_rejects_score_submissions() {
    let state = test_state("secret").await;
    let alliance = seed_alliance(&state).await;
    let player = seed_player(&state, &alliance, "alice").await;
    let (duel, days) = seed_duel(&state, &alliance).await;
    let uri = format!("/duels/{}/days/{}/scores", duel.duel_id, days[0].day_id);

    send(&state, "POST", &uri, true, Some(score_body(&player, json!(42.0))))
      .await;

    let resp = send(
      &state,
      "PATCH",
      &format!("/days/{}/lock", days[0].day_id),
      true,
      None,
    )
    .await;
    let body = body_json(resp).await;
    assert_eq!(body["lock"], "locked");

    let resp = send(
      &state,
      "POST",
      &uri,
      true,
      Some(score_body(&player, json!(999.0))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert_eq!(body, json!({ "success": false, "error": "Day is locked" }));

    // The stored value survives the rejected write.
    let stored = state
      .store
      .get_score(days[0].day_id, player.player_id)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(stored.value, Some(42.0));
  }

  #[tokio::test]
  async fn score_submission_reports_missing_references() {
    let state = test_state("secret").await;
    let alliance = seed_alliance(&state).await;
    let player = seed_player(&state, &alliance, "alice").await;
    let (duel, days) = seed_duel(&state, &alliance).await;

    let resp = send(
      &state,
      "POST",
      &format!("/duels/{}/days/{}/scores", Uuid::new_v4(), days[0].day_id),
      true,
      Some(score_body(&player, json!(1.0))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body, json!({ "success": false, "error": "Duel not found" }));

    let resp = send(
      &state,
      "POST",
      &format!("/duels/{}/days/{}/scores", duel.duel_id, Uuid::new_v4()),
      true,
      Some(score_body(&player, json!(1.0))),
    )
    .await;
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Day not found");

    let resp = send(
      &state,
      "POST",
      &format!("/duels/{}/days/{}/scores", duel.duel_id, days[0].day_id),
      true,
      Some(json!({ "playerId": Uuid::new_v4(), "score": 1.0 })),
    )
    .await;
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Player not found");
  }

  #[tokio::test]
  async fn unparseable_scores_fail_to_save() {
    let state = test_state("secret").await;
    let alliance = seed_alliance(&state).await;
    let player = seed_player(&state, &alliance, "alice").await;
    let (duel, days) = seed_duel(&state, &alliance).await;
    let uri = format!("/duels/{}/days/{}/scores", duel.duel_id, days[0].day_id);

    for bad in [json!("lots"), json!(-5.0)] {
      let resp =
        send(&state, "POST", &uri, true, Some(score_body(&player, bad))).await;
      assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
      let body = body_json(resp).await;
      assert_eq!(
        body,
        json!({ "success": false, "error": "Failed to save score" })
      );
    }
  }

  // ── Days ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn goal_edits_are_allowed_while_locked() {
    let state = test_state("secret").await;
    let alliance = seed_alliance(&state).await;
    let (_, days) = seed_duel(&state, &alliance).await;

    send(&state, "PATCH", &format!("/days/{}/lock", days[0].day_id), true, None)
      .await;

    let resp = send(
      &state,
      "PATCH",
      &format!("/days/{}/goal", days[0].day_id),
      true,
      Some(json!({ "score_goal": 250.0 })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["score_goal"], 250.0);
    assert_eq!(body["lock"], "locked");

    let resp = send(
      &state,
      "PATCH",
      &format!("/days/{}/goal", days[0].day_id),
      true,
      Some(json!({ "score_goal": -1.0 })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  }

  // ── Roster ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn player_lifecycle_over_http() {
    let state = test_state("secret").await;
    let alliance = seed_alliance(&state).await;

    let resp = send(
      &state,
      "POST",
      "/players",
      true,
      Some(json!({
        "allianceId": alliance.alliance_id,
        "username":   "alice",
        "rank":       "R3",
        "level":      42,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["username"], "alice");
    assert_eq!(created["active"], true);
    let player_id = created["player_id"].as_str().unwrap().to_owned();

    // Duplicate username, case-insensitively.
    let resp = send(
      &state,
      "POST",
      "/players",
      true,
      Some(json!({
        "allianceId": alliance.alliance_id,
        "username":   "ALICE",
        "rank":       "R1",
        "level":      10,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = send(
      &state,
      "PATCH",
      &format!("/players/{player_id}"),
      true,
      Some(json!({ "level": 60, "notes": "farm account" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["level"], 60);
    assert_eq!(body["notes"], "farm account");

    let resp = send(
      &state,
      "PATCH",
      &format!("/players/{player_id}/toggle-active"),
      true,
      None,
    )
    .await;
    let body = body_json(resp).await;
    assert_eq!(body["active"], false);

    let resp = send(
      &state,
      "DELETE",
      &format!("/players/{player_id}"),
      true,
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(
      &state,
      "GET",
      &format!("/players?alliance_id={}", alliance.alliance_id),
      true,
      None,
    )
    .await;
    let body = body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
  }

  #[tokio::test]
  async fn out_of_range_level_is_rejected() {
    let state = test_state("secret").await;
    let alliance = seed_alliance(&state).await;

    let resp = send(
      &state,
      "POST",
      "/players",
      true,
      Some(json!({
        "allianceId": alliance.alliance_id,
        "username":   "alice",
        "rank":       "R1",
        "level":      0,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  }
}
