//! SQL schema for the Duelboard SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS alliances (
    alliance_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    tag         TEXT NOT NULL COLLATE NOCASE UNIQUE,  -- 4 alphanumeric chars
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS players (
    player_id   TEXT PRIMARY KEY,
    alliance_id TEXT NOT NULL REFERENCES alliances(alliance_id) ON DELETE CASCADE,
    username    TEXT NOT NULL COLLATE NOCASE,
    rank        TEXT NOT NULL,     -- 'R1' .. 'R5'
    level       INTEGER NOT NULL,  -- 1 .. 100
    notes       TEXT,
    active      INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL,
    UNIQUE (alliance_id, username)
);

CREATE TABLE IF NOT EXISTS duels (
    duel_id     TEXT PRIMARY KEY,
    alliance_id TEXT NOT NULL REFERENCES alliances(alliance_id) ON DELETE CASCADE,
    start_date  TEXT NOT NULL,     -- ISO 8601 calendar date
    created_at  TEXT NOT NULL
);

-- Day slots are fixed at duel creation; only name, goal and lock mutate.
CREATE TABLE IF NOT EXISTS days (
    day_id          TEXT PRIMARY KEY,
    duel_id         TEXT NOT NULL REFERENCES duels(duel_id) ON DELETE CASCADE,
    day_number      INTEGER NOT NULL,
    name            TEXT NOT NULL,
    score_goal      REAL NOT NULL DEFAULT 0,
    locked          INTEGER NOT NULL DEFAULT 0,
    lock_changed_at TEXT NOT NULL,
    UNIQUE (duel_id, day_number)
);

-- At most one score per (day, player); NULL means 'not attempted'.
CREATE TABLE IF NOT EXISTS scores (
    score_id  TEXT PRIMARY KEY,
    day_id    TEXT NOT NULL REFERENCES days(day_id) ON DELETE CASCADE,
    player_id TEXT NOT NULL REFERENCES players(player_id) ON DELETE CASCADE,
    score     REAL,
    UNIQUE (day_id, player_id)
);

CREATE INDEX IF NOT EXISTS players_alliance_idx ON players(alliance_id);
CREATE INDEX IF NOT EXISTS duels_alliance_idx   ON duels(alliance_id);
CREATE INDEX IF NOT EXISTS days_duel_idx        ON days(duel_id);
CREATE INDEX IF NOT EXISTS scores_day_idx       ON scores(day_id);

PRAGMA user_version = 1;
";
