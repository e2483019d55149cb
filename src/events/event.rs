//! Lifecycle events published after each transition.
//!
//! Events are built from what the applier reports, so observers never need
//! to diff states. By the time `RoundOver` is published the next round has
//! already been dealt; the event carries the settled round's outcome.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, RoundOutcome};
use crate::rules::{AppliedEffects, GameResult};

/// Event kinds listeners can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    ActionApplied,
    RoundOver,
    GameOver,
}

impl EventKind {
    /// Every kind, in publication order.
    pub const ALL: [EventKind; 3] = [
        EventKind::ActionApplied,
        EventKind::RoundOver,
        EventKind::GameOver,
    ];
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventKind::ActionApplied => "ACTION_APPLIED",
            EventKind::RoundOver => "ROUND_OVER",
            EventKind::GameOver => "GAME_OVER",
        };
        f.write_str(name)
    }
}

/// Something that happened to the match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An action was applied.
    ActionApplied(AppliedEffects),
    /// A round was settled.
    RoundOver(RoundOutcome),
    /// The match ended.
    GameOver(GameResult),
}

impl GameEvent {
    /// Kind of this event.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::ActionApplied(_) => EventKind::ActionApplied,
            GameEvent::RoundOver(_) => EventKind::RoundOver,
            GameEvent::GameOver(_) => EventKind::GameOver,
        }
    }

    /// Events produced by one applied action, in publication order.
    #[must_use]
    pub fn from_effects(effects: &AppliedEffects, state: &GameState) -> Vec<GameEvent> {
        let mut events = vec![GameEvent::ActionApplied(effects.clone())];

        if let Some(outcome) = &effects.round_outcome {
            events.push(GameEvent::RoundOver(outcome.clone()));
            if outcome.match_winner.is_some() {
                if let Some(winner) = state.winner() {
                    events.push(GameEvent::GameOver(GameResult {
                        winner,
                        rounds_won: state.rounds_won.clone(),
                        total_scores: state.total_scores.clone(),
                    }));
                }
            }
        }
        events
    }
}
