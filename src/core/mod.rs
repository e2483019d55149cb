//! Core engine types: goods, players, tokens, state, actions, RNG, configuration.
//!
//! Everything here is plain data with checked mutation. The rules that move
//! cards between these structures live in `crate::rules`.

pub mod action;
pub mod config;
pub mod error;
pub mod goods;
pub mod player;
pub mod rng;
pub mod state;
pub mod tokens;

pub use action::{Action, ActionRecord, Sell, Take};
pub use config::{JaipurConfig, MAX_PLAYERS, MIN_PLAYERS};
pub use error::{ConfigError, CounterError, EngineError, EngineResult};
pub use goods::{counter_total, Counter, GoodMap, GoodType, GOOD_COUNT};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{GameState, MatchStatus, RoundOutcome, RoundPhase, RoundState};
pub use tokens::{BonusTokens, TokenDraw, TokenStack, BONUS_TIERS, MIN_BONUS_SALE};
