//! Rules engine trait and the Jaipur implementation.
//!
//! Search and match-running code is written against `RulesEngine` so it
//! never reaches into the rule functions directly:
//! - What actions are legal
//! - How actions modify state
//! - Whether the match is over

use serde::{Deserialize, Serialize};

use crate::core::{Action, EngineResult, GameState, JaipurConfig, PlayerId, PlayerMap};

use super::applier::{apply, AppliedEffects};
use super::generator::legal_actions;
use super::setup::new_match;

/// Result of a finished match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Match winner.
    pub winner: PlayerId,
    /// Round wins per player.
    pub rounds_won: PlayerMap<u32>,
    /// Cumulative score per player.
    pub total_scores: PlayerMap<u32>,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winner == player
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: never empty for a live match
/// - `apply_action`: must be deterministic for MCTS
/// - `is_terminal`: return `None` while the match continues
pub trait RulesEngine {
    /// Legal actions for the player to move.
    fn legal_actions(&self, state: &GameState) -> EngineResult<Vec<Action>>;

    /// Apply an action for the player to move.
    fn apply_action(&self, state: &mut GameState, action: &Action) -> EngineResult<AppliedEffects>;

    /// Check if the match is over.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Player whose turn it is.
    fn current_player(&self, state: &GameState) -> PlayerId {
        state.current_player
    }
}

/// The Jaipur rules.
///
/// ```
/// use rust_jaipur::core::JaipurConfig;
/// use rust_jaipur::rules::{JaipurRules, RulesEngine};
///
/// let rules = JaipurRules;
/// let mut state = rules.new_match(JaipurConfig::default(), 2, 1).unwrap();
/// while rules.is_terminal(&state).is_none() {
///     let action = rules.legal_actions(&state).unwrap()[0];
///     rules.apply_action(&mut state, &action).unwrap();
/// }
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JaipurRules;

impl JaipurRules {
    /// Create a match dealt with these rules.
    pub fn new_match(
        &self,
        config: JaipurConfig,
        player_count: usize,
        seed: u64,
    ) -> EngineResult<GameState> {
        new_match(config, player_count, seed)
    }
}

impl RulesEngine for JaipurRules {
    fn legal_actions(&self, state: &GameState) -> EngineResult<Vec<Action>> {
        legal_actions(state)
    }

    fn apply_action(&self, state: &mut GameState, action: &Action) -> EngineResult<AppliedEffects> {
        apply(state, action)
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        state.winner().map(|winner| GameResult {
            winner,
            rounds_won: state.rounds_won.clone(),
            total_scores: state.total_scores.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EngineError;

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult {
            winner: PlayerId::new(1),
            rounds_won: PlayerMap::with_default(2),
            total_scores: PlayerMap::with_default(2),
        };
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));
    }

    #[test]
    fn test_first_action_match_terminates() {
        let rules = JaipurRules;
        let mut state = rules.new_match(JaipurConfig::default(), 2, 31).unwrap();

        let mut steps = 0;
        while rules.is_terminal(&state).is_none() {
            let action = rules.legal_actions(&state).unwrap()[0];
            rules.apply_action(&mut state, &action).unwrap();
            steps += 1;
            assert!(steps < 10_000, "match did not terminate");
        }

        let result = rules.is_terminal(&state).unwrap();
        assert_eq!(result.rounds_won[result.winner], 2);
        assert!(matches!(rules.legal_actions(&state), Err(EngineError::MatchEnded)));
    }
}
