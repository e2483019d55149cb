//! Search diagnostics.

use serde::{Deserialize, Serialize};

/// Counters collected during one search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Iterations run.
    pub iterations: u32,

    /// Nodes whose edges were listed.
    pub nodes_expanded: u32,

    /// Rollouts played.
    pub simulations: u32,

    /// Rollouts cut off and scored by the heuristic.
    pub truncated_rollouts: u32,

    /// Actions applied inside rollouts.
    pub rollout_actions: u64,

    /// Deepest node created.
    pub max_depth: u16,

    /// Wall time (microseconds). Diagnostic only; never affects the result.
    pub time_us: u64,
}

impl SearchStats {
    /// Empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Iterations per second.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            f64::from(self.iterations) / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Mean rollout length in actions.
    #[must_use]
    pub fn avg_rollout_length(&self) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            self.rollout_actions as f64 / f64::from(self.simulations)
        }
    }
}
