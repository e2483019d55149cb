//! Search parameters.

use serde::{Deserialize, Serialize};

/// MCTS configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MCTSConfig {
    /// UCB1 exploration constant (default: sqrt(2)).
    pub exploration_constant: f64,

    /// Deepest tree node, in actions from the root (0 = unlimited).
    pub max_depth: u32,

    /// Actions per rollout before the heuristic scores it (0 = play the
    /// match out).
    pub rollout_depth: u32,

    /// Node budget; the search stops early once the tree holds this many.
    pub max_nodes: usize,

    /// Seed for rollouts and opponent sampling. Same seed, same search.
    pub seed: u64,

    /// Root selection temperature (0 = most visited).
    pub temperature: f64,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            max_depth: 0,
            rollout_depth: 120,
            max_nodes: 100_000,
            seed: 42,
            temperature: 0.0,
        }
    }
}

impl MCTSConfig {
    /// Set the exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the tree depth limit.
    #[must_use]
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the rollout length.
    #[must_use]
    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    /// Set the node budget.
    #[must_use]
    pub fn with_max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Set the root selection temperature.
    #[must_use]
    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = temp;
        self
    }
}
