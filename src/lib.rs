//! # rust-jaipur
//!
//! Rules engine for the two-to-four player trading card game Jaipur, built
//! for simulation, search and self-play.
//!
//! ## Design Principles
//!
//! 1. **Closed vocabulary**: goods, actions and phases are plain enums, and
//!    every per-good or per-player table is a fixed-size map.
//!
//! 2. **Checked mutation**: card counts live in bounded counters. A rule
//!    that would break a bound surfaces as an error, never as bad state.
//!
//! 3. **Deterministic**: all randomness flows from the match seed, so a
//!    match replays exactly from its seed and the actions played.
//!
//! ## Architecture
//!
//! - **Cheap clones**: persistent `im` collections make `GameState::clone`
//!   fast enough to clone once per search iteration.
//!
//! - **Engine trait**: search and the match runner only see `RulesEngine`.
//!
//! ## Modules
//!
//! - `core`: goods, players, tokens, state, actions, RNG, configuration
//! - `rules`: setup, action generation, application, round lifecycle
//! - `events`: lifecycle events, the event bus and metric collectors
//! - `players`: built-in players and the match runner
//! - `encoding`: feature vectors for learned evaluators
//! - `mcts`: Monte Carlo Tree Search

pub mod core;
pub mod encoding;
pub mod events;
pub mod mcts;
pub mod players;
pub mod rules;

pub use crate::core::{
    Action, ActionRecord, EngineError, EngineResult, GameRng, GameState, GoodMap, GoodType,
    JaipurConfig, MatchStatus, PlayerId, PlayerMap, RoundOutcome, RoundPhase, RoundState,
};

pub use crate::rules::{
    apply, legal_actions, new_match, AppliedEffects, GameResult, JaipurRules, RulesEngine,
};

pub use crate::events::{EventBus, EventKind, GameEvent, MetricsCollector, MetricsListener};

pub use crate::players::{MatchRunner, Player, RunnerConfig};

pub use crate::encoding::{JaipurEncoder, StateEncoder};

pub use crate::mcts::{MCTSConfig, MCTSSearch, SearchStats};
