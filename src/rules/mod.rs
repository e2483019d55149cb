//! Jaipur rules: setup, action generation, application and round lifecycle.
//!
//! Control flow:
//! - `setup` deals a match and each new round
//! - `generator` lists legal actions for the player to move
//! - `applier` validates and applies the chosen action
//! - `lifecycle` settles rounds and ends the match
//!
//! `engine` wraps these behind the `RulesEngine` trait used by search and
//! the match runner.

pub mod applier;
pub mod engine;
pub mod generator;
pub mod lifecycle;
pub mod setup;

pub use applier::{apply, AppliedEffects};
pub use engine::{GameResult, JaipurRules, RulesEngine};
pub use generator::{legal_actions, validate_action};
pub use lifecycle::{camel_leader, round_should_end, round_winner, settle_round};
pub use setup::{new_match, new_round};
