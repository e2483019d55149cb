//! Player implementations.

use crate::core::{Action, EngineResult, GameRng, GameState};
use crate::mcts::{MCTSConfig, MCTSSearch};
use crate::rules::{apply, JaipurRules};

/// Something that picks an action on its turn.
///
/// `actions` is the legal list for `state` and is never empty. Returning an
/// action outside it is reported by the runner as an illegal action. An
/// error stops the match and reaches the runner's caller unchanged.
pub trait Player {
    /// Pick one of `actions`.
    fn choose_action(&mut self, state: &GameState, actions: &[Action]) -> EngineResult<Action>;

    /// Name for logs.
    fn name(&self) -> &str {
        "player"
    }
}

/// Uniformly random player.
#[derive(Clone, Debug)]
pub struct RandomPlayer {
    rng: GameRng,
}

impl RandomPlayer {
    /// Random player drawing from its own seeded generator.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn choose_action(&mut self, _state: &GameState, actions: &[Action]) -> EngineResult<Action> {
        Ok(actions[self.rng.gen_range_usize(0..actions.len())])
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Always plays the first listed action.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstActionPlayer;

impl Player for FirstActionPlayer {
    fn choose_action(&mut self, _state: &GameState, actions: &[Action]) -> EngineResult<Action> {
        Ok(actions[0])
    }

    fn name(&self) -> &str {
        "first"
    }
}

/// Plays the action worth the most points right now.
///
/// Each action is tried on a clone of the state. Ties go to the earlier
/// action in the list. An offered action that fails to apply is an engine
/// bug and is returned as such.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyPlayer;

impl Player for GreedyPlayer {
    fn choose_action(&mut self, state: &GameState, actions: &[Action]) -> EngineResult<Action> {
        let mut best = (actions[0], 0);
        for action in actions {
            let mut trial = state.clone();
            let effects = apply(&mut trial, action)?;
            if effects.points > best.1 {
                best = (*action, effects.points);
            }
        }
        Ok(best.0)
    }

    fn name(&self) -> &str {
        "greedy"
    }
}

/// Player backed by tree search.
///
/// Search errors are passed through; the player never substitutes an action
/// of its own.
pub struct MctsPlayer {
    search: MCTSSearch<JaipurRules>,
    iterations: u32,
}

impl MctsPlayer {
    /// Search `iterations` times per decision.
    #[must_use]
    pub fn new(config: MCTSConfig, iterations: u32) -> Self {
        Self {
            search: MCTSSearch::new(JaipurRules, config),
            iterations,
        }
    }

    /// The underlying search, for statistics.
    #[must_use]
    pub fn search(&self) -> &MCTSSearch<JaipurRules> {
        &self.search
    }
}

impl Player for MctsPlayer {
    fn choose_action(&mut self, state: &GameState, _actions: &[Action]) -> EngineResult<Action> {
        self.search.search(state, self.iterations)
    }

    fn name(&self) -> &str {
        "mcts"
    }
}

impl std::fmt::Debug for MctsPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MctsPlayer")
            .field("config", self.search.config())
            .field("iterations", &self.iterations)
            .finish()
    }
}
