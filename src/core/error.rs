//! Engine error types.
//!
//! None of these are retryable: the engine does no I/O, so every error is
//! either a bad configuration, a bad action, or an engine bug.

use thiserror::Error;

use super::action::Action;
use super::goods::GoodType;
use super::player::PlayerId;

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Rejected configuration, reported at match creation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("player count {count} outside supported range {min}..={max}")]
    PlayerCount { count: usize, min: usize, max: usize },

    #[error("no token progression configured for {0}")]
    MissingTokenProgression(GoodType),

    #[error("minimum sell threshold for {0} must be at least 1")]
    ZeroSellThreshold(GoodType),

    #[error("{name} must be at least {min}, got {value}")]
    TooSmall { name: &'static str, value: u32, min: u32 },

    #[error("{name} ({value}) exceeds {limit_name} ({limit})")]
    Exceeds {
        name: &'static str,
        value: u32,
        limit_name: &'static str,
        limit: u32,
    },

    #[error("deck holds {available} drawable cards but the opening deal needs {needed}")]
    DeckTooSmall { available: u32, needed: u32 },
}

/// Bounded counter violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CounterError {
    #[error("{value} + {delta} exceeds bound {max}")]
    Overflow { value: u32, delta: u32, max: u32 },

    #[error("{value} - {delta} drops below zero")]
    Underflow { value: u32, delta: u32 },
}

/// Any failure surfaced by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("illegal action `{action}` for {player}: {reason}")]
    IllegalAction {
        player: PlayerId,
        action: Action,
        reason: String,
    },

    #[error("internal consistency violation: {0}")]
    InternalConsistency(String),

    #[error("the match has already ended")]
    MatchEnded,

    #[error("snapshot failed: {0}")]
    Snapshot(String),
}

impl EngineError {
    /// Build an `IllegalAction` error.
    pub fn illegal(player: PlayerId, action: &Action, reason: impl Into<String>) -> Self {
        EngineError::IllegalAction {
            player,
            action: *action,
            reason: reason.into(),
        }
    }

    /// Wrap a counter violation with the name of the counter.
    pub(crate) fn counter(context: impl std::fmt::Display) -> impl FnOnce(CounterError) -> Self {
        let context = context.to_string();
        move |err| EngineError::InternalConsistency(format!("{context}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: EngineError = ConfigError::ZeroSellThreshold(GoodType::Gold).into();
        assert_eq!(
            err.to_string(),
            "invalid configuration: minimum sell threshold for Gold must be at least 1"
        );
    }

    #[test]
    fn test_counter_context() {
        let wrap = EngineError::counter("Player 0 herd");
        let err = wrap(CounterError::Overflow { value: 11, delta: 1, max: 11 });
        assert_eq!(
            err,
            EngineError::InternalConsistency("Player 0 herd: 11 + 1 exceeds bound 11".to_string())
        );
    }

    #[test]
    fn test_illegal_action_message() {
        let err = EngineError::illegal(
            PlayerId::new(1),
            &Action::sell(GoodType::Diamonds, 1),
            "below minimum sale",
        );
        assert_eq!(
            err.to_string(),
            "illegal action `sell 1 Diamonds` for Player 1: below minimum sale"
        );
    }
}
