//! Decision makers and the loop that drives a match with them.
//!
//! - `player`: the `Player` trait and built-in players
//! - `runner`: `MatchRunner`, which asks players for actions, checks them,
//!   applies them and publishes events

pub mod player;
pub mod runner;

pub use player::{FirstActionPlayer, GreedyPlayer, MctsPlayer, Player, RandomPlayer};
pub use runner::{MatchRunner, RunnerConfig};
