//! Core types and trait definitions for the Duelboard scoring engine.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod alliance;
pub mod duel;
pub mod error;
pub mod leaderboard;
pub mod score;
pub mod stats;
pub mod store;

pub use error::{Error, ErrorKind, Result};
