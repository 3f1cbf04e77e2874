//! Route handlers, one module per resource.

pub mod alliances;
pub mod days;
pub mod duels;
pub mod leaderboard;
pub mod players;
pub mod scores;
