//! Selection, rollout and opponent policies.
//!
//! - `SelectionPolicy`: which edge to descend (UCB1, PUCT)
//! - `SimulationPolicy`: how rollouts play out
//! - `OpponentPolicy`: what the other seats do on their turns

use crate::core::{Action, EngineResult, GameRng, GameState, PlayerId, PlayerMap};
use crate::rules::{GameResult, RulesEngine};

use super::config::MCTSConfig;
use super::node::MCTSNode;

// =============================================================================
// Selection Policy
// =============================================================================

/// Picks the edge to descend from a fully expanded node.
pub trait SelectionPolicy: Send + Sync {
    /// Index of the chosen edge. `node.edges` is never empty.
    fn select(&self, node: &MCTSNode, player: PlayerId, config: &MCTSConfig) -> usize;
}

/// Highest score wins; the first edge wins ties.
fn argmax(scores: impl Iterator<Item = f64>) -> usize {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, score) in scores.enumerate() {
        if score > best.1 {
            best = (i, score);
        }
    }
    best.0
}

/// UCB1: `Q(a) + c * sqrt(ln N / n(a))`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UCB1;

impl SelectionPolicy for UCB1 {
    fn select(&self, node: &MCTSNode, player: PlayerId, config: &MCTSConfig) -> usize {
        let ln_parent = f64::from(node.visits.max(1)).ln();
        argmax(node.edges.iter().map(|edge| {
            if edge.visits == 0 {
                return f64::INFINITY;
            }
            edge.mean_reward(player)
                + config.exploration_constant * (ln_parent / f64::from(edge.visits)).sqrt()
        }))
    }
}

/// PUCT: `Q(a) + c * P(a) * sqrt(N) / (1 + n(a))`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PUCT;

impl SelectionPolicy for PUCT {
    fn select(&self, node: &MCTSNode, player: PlayerId, config: &MCTSConfig) -> usize {
        let sqrt_parent = f64::from(node.visits.max(1)).sqrt();
        argmax(node.edges.iter().map(|edge| {
            edge.mean_reward(player)
                + config.exploration_constant * f64::from(edge.prior) * sqrt_parent
                    / (1.0 + f64::from(edge.visits))
        }))
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Plays a rollout from a leaf.
pub trait SimulationPolicy<E: RulesEngine>: Send + Sync {
    /// Play on from `state`, returning rewards and the number of actions
    /// applied. `max_actions` of 0 means play to the end of the match.
    fn simulate(
        &self,
        engine: &E,
        state: &mut GameState,
        rng: &mut GameRng,
        max_actions: u32,
    ) -> EngineResult<Rollout>;
}

/// Outcome of one rollout.
#[derive(Clone, Debug, PartialEq)]
pub struct Rollout {
    /// Reward per player in `[0, 1]`.
    pub rewards: PlayerMap<f64>,
    /// Actions applied.
    pub actions: u32,
    /// Cut off before the match ended.
    pub truncated: bool,
}

/// Uniformly random rollouts.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomSimulation;

impl<E: RulesEngine> SimulationPolicy<E> for RandomSimulation {
    fn simulate(
        &self,
        engine: &E,
        state: &mut GameState,
        rng: &mut GameRng,
        max_actions: u32,
    ) -> EngineResult<Rollout> {
        let mut actions = 0;
        loop {
            if let Some(result) = engine.is_terminal(state) {
                return Ok(Rollout {
                    rewards: result_to_rewards(&result, state.player_count()),
                    actions,
                    truncated: false,
                });
            }
            if max_actions > 0 && actions >= max_actions {
                return Ok(Rollout {
                    rewards: heuristic_eval(state),
                    actions,
                    truncated: true,
                });
            }

            let legal = engine.legal_actions(state)?;
            let idx = rng.gen_range_usize(0..legal.len());
            engine.apply_action(state, &legal[idx])?;
            actions += 1;
        }
    }
}

// =============================================================================
// Opponent Policy
// =============================================================================

/// Chooses actions for the seats that are not searching.
pub trait OpponentPolicy<E: RulesEngine>: Send + Sync {
    /// Pick an action for the player to move.
    fn choose_action(&self, engine: &E, state: &GameState, rng: &mut GameRng)
        -> EngineResult<Action>;
}

/// Uniformly random opponent.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformOpponent;

impl<E: RulesEngine> OpponentPolicy<E> for UniformOpponent {
    fn choose_action(
        &self,
        engine: &E,
        state: &GameState,
        rng: &mut GameRng,
    ) -> EngineResult<Action> {
        let legal = engine.legal_actions(state)?;
        Ok(legal[rng.gen_range_usize(0..legal.len())])
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// 1 for the match winner, 0 for everyone else.
#[must_use]
pub fn result_to_rewards(result: &GameResult, player_count: usize) -> PlayerMap<f64> {
    PlayerMap::new(player_count, |player| {
        if result.is_winner(player) {
            1.0
        } else {
            0.0
        }
    })
}

/// Estimate for an unfinished match.
///
/// Round wins dominate; the current round's score share breaks ties within
/// the same number of wins. Values stay in `[0, 1]`.
#[must_use]
pub fn heuristic_eval(state: &GameState) -> PlayerMap<f64> {
    let player_count = state.player_count();
    let total: u32 = state.round.scores.values().sum();
    let wins_needed = f64::from(state.config().round_wins_for_match);

    PlayerMap::new(player_count, |player| {
        let share = if total == 0 {
            1.0 / player_count as f64
        } else {
            f64::from(state.round.scores[player]) / f64::from(total)
        };
        let wins = f64::from(state.rounds_won[player]).min(wins_needed);
        (wins + share) / (wins_needed + 1.0)
    })
}
