//! Core MCTS search algorithm.
//!
//! Public-state MCTS: the searching player's turns branch over every legal
//! action, while the other seats' actions are sampled from an opponent
//! policy and recorded as edges as they are seen. Each iteration works on
//! its own clone of the state, so the caller's state is never touched.

use std::time::Instant;

use log::debug;

use crate::core::{Action, EngineError, EngineResult, GameRng, GameState, PlayerId, PlayerMap};
use crate::rules::RulesEngine;

use super::config::MCTSConfig;
use super::node::{MCTSNode, NodeId, NodeKind};
use super::policy::{
    heuristic_eval, result_to_rewards, OpponentPolicy, RandomSimulation, SelectionPolicy,
    SimulationPolicy, UniformOpponent, UCB1,
};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Main MCTS search context.
///
/// Owns the rules engine, the tree and the search RNG. The tree is rebuilt
/// on every call to [`MCTSSearch::search`].
pub struct MCTSSearch<E: RulesEngine> {
    engine: E,
    config: MCTSConfig,
    tree: MCTSTree,
    rng: GameRng,
    selection: Box<dyn SelectionPolicy>,
    simulation: Box<dyn SimulationPolicy<E>>,
    opponent: Box<dyn OpponentPolicy<E>>,
    stats: SearchStats,
}

impl<E: RulesEngine> MCTSSearch<E> {
    /// Create a search context with UCB1, random rollouts and a uniform
    /// opponent.
    pub fn new(engine: E, config: MCTSConfig) -> Self {
        let rng = GameRng::new(config.seed);
        let capacity = config.max_nodes.min(1 << 16);

        Self {
            engine,
            tree: MCTSTree::new(PlayerId::new(0), 2, capacity),
            config,
            rng,
            selection: Box::new(UCB1),
            simulation: Box::new(RandomSimulation),
            opponent: Box::new(UniformOpponent),
            stats: SearchStats::default(),
        }
    }

    /// Set a custom selection policy.
    #[must_use]
    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom simulation policy.
    #[must_use]
    pub fn with_simulation<S: SimulationPolicy<E> + 'static>(mut self, simulation: S) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Set a custom opponent policy.
    #[must_use]
    pub fn with_opponent<O: OpponentPolicy<E> + 'static>(mut self, opponent: O) -> Self {
        self.opponent = Box::new(opponent);
        self
    }

    /// Search for the best action of the player to move in `state`.
    ///
    /// Fails with `MatchEnded` on a finished match; engine errors raised
    /// inside the search are returned as-is.
    pub fn search(&mut self, state: &GameState, iterations: u32) -> EngineResult<Action> {
        let start = Instant::now();
        self.stats.reset();

        let player = state.current_player;
        self.tree.reset(player, state.player_count());

        let root = self.tree.root();
        self.expand_node(root, state)?;

        if self.tree.get(root).is_terminal() {
            return Err(EngineError::MatchEnded);
        }

        if self.tree.get(root).edges.len() == 1 {
            return Ok(self.tree.get(root).edges[0].action);
        }

        for _ in 0..iterations {
            let mut sim_state = state.clone();
            self.iteration(&mut sim_state, player)?;
            self.stats.iterations += 1;

            if self.tree.len() >= self.config.max_nodes {
                break;
            }
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;

        let action = self.best_action()?;
        debug!(
            "search for {player}: {action} after {} iterations, {} nodes",
            self.stats.iterations,
            self.tree.len()
        );
        Ok(action)
    }

    /// Single MCTS iteration: select, expand, simulate, backpropagate.
    fn iteration(&mut self, state: &mut GameState, searching_player: PlayerId) -> EngineResult<()> {
        let mut path: Vec<(NodeId, usize)> = Vec::new();
        let mut current = self.tree.root();

        // === SELECTION ===
        loop {
            let node = self.tree.get(current);

            if let Some(rewards) = node.terminal_reward().cloned() {
                self.backpropagate(&path, &rewards);
                return Ok(());
            }

            if self.config.max_depth > 0 && u32::from(node.depth) >= self.config.max_depth {
                let rewards = heuristic_eval(state);
                self.backpropagate(&path, &rewards);
                return Ok(());
            }

            // Other seats: sample, then follow or create the matching edge
            if node.is_sampled() {
                let action = self.opponent.choose_action(&self.engine, state, &mut self.rng)?;
                self.engine.apply_action(state, &action)?;

                let player_count = self.tree.player_count();
                let edge_idx = self.tree.get_mut(current).sampled_edge(action, player_count);
                path.push((current, edge_idx));
                current = self.ensure_child(current, edge_idx, state)?;
                continue;
            }

            // === EXPANSION ===
            if self.tree.get(current).has_unexpanded() {
                let edge_idx = self.select_unexpanded(current);
                path.push((current, edge_idx));

                let action = self.tree.get(current).edges[edge_idx].action;
                self.engine.apply_action(state, &action)?;
                self.expand_child(current, edge_idx, state)?;

                // === SIMULATION ===
                let rewards = self.simulate(state)?;
                self.backpropagate(&path, &rewards);
                return Ok(());
            }

            let edge_idx = self
                .selection
                .select(self.tree.get(current), searching_player, &self.config);
            path.push((current, edge_idx));

            let action = self.tree.get(current).edges[edge_idx].action;
            self.engine.apply_action(state, &action)?;
            current = self.tree.get(current).edges[edge_idx].child;
        }
    }

    /// Mark a node terminal, sampled, or a decision over the legal actions.
    fn expand_node(&mut self, node_id: NodeId, state: &GameState) -> EngineResult<()> {
        let player_count = self.tree.player_count();

        if let Some(result) = self.engine.is_terminal(state) {
            self.tree.get_mut(node_id).kind =
                NodeKind::Terminal(result_to_rewards(&result, player_count));
            return Ok(());
        }

        if self.tree.get(node_id).to_move == self.tree.root_node().to_move {
            let actions = self.engine.legal_actions(state)?;
            self.tree.get_mut(node_id).list_actions(actions, player_count);
        } else {
            self.tree.get_mut(node_id).kind = NodeKind::Sampled;
        }

        self.stats.nodes_expanded += 1;
        Ok(())
    }

    /// Pick an unexpanded edge at random.
    fn select_unexpanded(&mut self, node_id: NodeId) -> usize {
        let unexpanded: Vec<usize> = self.tree.get(node_id).unexpanded_edges().collect();
        match unexpanded.len() {
            0 => 0,
            1 => unexpanded[0],
            n => unexpanded[self.rng.gen_range_usize(0..n)],
        }
    }

    /// Create and expand the child behind an edge.
    fn expand_child(
        &mut self,
        parent_id: NodeId,
        edge_idx: usize,
        state: &GameState,
    ) -> EngineResult<NodeId> {
        let depth = self.tree.get(parent_id).depth + 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let child_id = self
            .tree
            .alloc(MCTSNode::new(parent_id, state.current_player, depth));
        self.tree.get_mut(parent_id).edges[edge_idx].child = child_id;
        self.expand_node(child_id, state)?;
        Ok(child_id)
    }

    /// Child behind an edge, created on first use.
    fn ensure_child(
        &mut self,
        parent_id: NodeId,
        edge_idx: usize,
        state: &GameState,
    ) -> EngineResult<NodeId> {
        let child = self.tree.get(parent_id).edges[edge_idx].child;
        if child.is_none() {
            self.expand_child(parent_id, edge_idx, state)
        } else {
            Ok(child)
        }
    }

    /// Roll out from `state` with a forked generator.
    fn simulate(&mut self, state: &mut GameState) -> EngineResult<PlayerMap<f64>> {
        let mut sim_rng = self.rng.fork();
        let rollout = self.simulation.simulate(
            &self.engine,
            state,
            &mut sim_rng,
            self.config.rollout_depth,
        )?;

        self.stats.simulations += 1;
        self.stats.rollout_actions += u64::from(rollout.actions);
        if rollout.truncated {
            self.stats.truncated_rollouts += 1;
        }
        Ok(rollout.rewards)
    }

    /// Add `rewards` to every edge on the path.
    fn backpropagate(&mut self, path: &[(NodeId, usize)], rewards: &PlayerMap<f64>) {
        for &(node_id, edge_idx) in path.iter().rev() {
            let node = self.tree.get_mut(node_id);
            node.visits += 1;
            node.edges[edge_idx].record(rewards);
        }

        // The root is not on the path as a child
        if path.is_empty() {
            self.tree.root_node_mut().visits += 1;
        }
    }

    /// Most visited root action, or a visit-weighted draw above zero
    /// temperature.
    fn best_action(&mut self) -> EngineResult<Action> {
        let root = self.tree.root_node();
        let greedy = root.best_edge_by_visits().map(|e| e.action);

        let chosen = if self.config.temperature <= 0.0 {
            greedy
        } else {
            let exponent = (1.0 / self.config.temperature) as f32;
            let weights: Vec<f32> = root
                .edges
                .iter()
                .map(|e| (e.visits as f32).powf(exponent))
                .collect();
            self.rng
                .choose_weighted(&weights)
                .map(|idx| root.edges[idx].action)
                .or(greedy)
        };

        chosen.ok_or_else(|| {
            EngineError::InternalConsistency("search root has no actions".to_string())
        })
    }

    /// Search statistics of the last call.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Tree of the last call.
    #[must_use]
    pub fn tree(&self) -> &MCTSTree {
        &self.tree
    }

    /// Root actions with their visit counts.
    pub fn action_visits(&self) -> Vec<(Action, u32)> {
        self.tree
            .root_node()
            .edges
            .iter()
            .map(|e| (e.action, e.visits))
            .collect()
    }

    /// Root actions with visit shares summing to 1.
    pub fn action_probabilities(&self) -> Vec<(Action, f64)> {
        let root = self.tree.root_node();
        let total: u32 = root.edges.iter().map(|e| e.visits).sum();

        if total == 0 {
            let uniform = 1.0 / root.edges.len().max(1) as f64;
            return root.edges.iter().map(|e| (e.action, uniform)).collect();
        }

        root.edges
            .iter()
            .map(|e| (e.action, f64::from(e.visits) / f64::from(total)))
            .collect()
    }

    /// The rules engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The configuration.
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::core::JaipurConfig;
    use crate::mcts::policy::{Rollout, PUCT};
    use crate::rules::{legal_actions, new_match, JaipurRules};

    /// Always answers with the first legal action.
    struct FirstReply(Arc<AtomicUsize>);

    impl OpponentPolicy<JaipurRules> for FirstReply {
        fn choose_action(
            &self,
            engine: &JaipurRules,
            state: &GameState,
            _rng: &mut GameRng,
        ) -> EngineResult<Action> {
            self.0.fetch_add(1, Ordering::Relaxed);
            Ok(engine.legal_actions(state)?[0])
        }
    }

    /// Scores every leaf as a win for seat 1 without playing it out.
    struct SeatOneWins(Arc<AtomicUsize>);

    impl SimulationPolicy<JaipurRules> for SeatOneWins {
        fn simulate(
            &self,
            _engine: &JaipurRules,
            state: &mut GameState,
            _rng: &mut GameRng,
            _max_actions: u32,
        ) -> EngineResult<Rollout> {
            self.0.fetch_add(1, Ordering::Relaxed);
            Ok(Rollout {
                rewards: PlayerMap::new(state.player_count(), |p| {
                    if p == PlayerId::new(1) {
                        1.0
                    } else {
                        0.0
                    }
                }),
                actions: 0,
                truncated: false,
            })
        }
    }

    fn opening(seed: u64) -> GameState {
        new_match(JaipurConfig::default(), 2, seed).unwrap()
    }

    fn quick() -> MCTSConfig {
        MCTSConfig::default().with_rollout_depth(40)
    }

    #[test]
    fn test_search_returns_legal_action() {
        let state = opening(42);
        let mut search = MCTSSearch::new(JaipurRules, quick());
        let action = search.search(&state, 100).unwrap();

        assert!(legal_actions(&state).unwrap().contains(&action));
    }

    #[test]
    fn test_search_leaves_state_untouched() {
        let state = opening(8);
        let before = state.clone();
        let mut search = MCTSSearch::new(JaipurRules, quick());
        search.search(&state, 50).unwrap();
        assert_eq!(state, before);
    }

    #[test]
    fn test_search_stats() {
        let state = opening(42);
        let mut search = MCTSSearch::new(JaipurRules, quick());
        search.search(&state, 50).unwrap();

        let stats = search.stats();
        assert_eq!(stats.iterations, 50);
        assert!(stats.simulations > 0);
        assert!(stats.nodes_expanded > 0);
        assert!(stats.avg_rollout_length() > 0.0);
    }

    #[test]
    fn test_search_deterministic() {
        let state = opening(42);
        let config = quick().with_seed(12345);

        let mut a = MCTSSearch::new(JaipurRules, config.clone());
        let mut b = MCTSSearch::new(JaipurRules, config);

        assert_eq!(a.search(&state, 100).unwrap(), b.search(&state, 100).unwrap());
        assert_eq!(a.action_visits(), b.action_visits());
    }

    #[test]
    fn test_action_probabilities() {
        let state = opening(42);
        let mut search = MCTSSearch::new(JaipurRules, quick());
        search.search(&state, 100).unwrap();

        let sum: f64 = search.action_probabilities().iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tree_growth() {
        let state = opening(42);
        let mut search = MCTSSearch::new(JaipurRules, quick());
        search.search(&state, 200).unwrap();

        let tree_stats = search.tree().stats();
        assert!(tree_stats.node_count > 1);
        assert!(tree_stats.max_depth > 0);
    }

    #[test]
    fn test_node_budget_stops_search() {
        let state = opening(3);
        let mut search = MCTSSearch::new(JaipurRules, quick().with_max_nodes(20));
        search.search(&state, 1000).unwrap();

        assert!(search.stats().iterations < 1000);
        assert!(search.tree().len() >= 20);
    }

    #[test]
    fn test_depth_limit_and_puct() {
        let state = opening(5);
        let config = quick().with_max_depth(2).with_temperature(1.0);
        let mut search = MCTSSearch::new(JaipurRules, config).with_selection(PUCT);
        let action = search.search(&state, 100).unwrap();

        assert!(legal_actions(&state).unwrap().contains(&action));
        assert!(search.stats().max_depth <= 2);
    }

    #[test]
    fn test_custom_opponent_plays_other_seats() {
        let calls = Arc::new(AtomicUsize::new(0));
        let state = opening(42);
        let mut search =
            MCTSSearch::new(JaipurRules, quick()).with_opponent(FirstReply(Arc::clone(&calls)));
        search.search(&state, 150).unwrap();

        let stats = search.tree().stats();
        assert!(calls.load(Ordering::Relaxed) > 0);
        assert!(stats.sampled_count > 0);
        assert!(stats.sampled_replies > 0);
        // A fixed reply never branches an opponent node
        assert_eq!(stats.widest_sampled, 1);
    }

    #[test]
    fn test_custom_simulation_scores_leaves() {
        let calls = Arc::new(AtomicUsize::new(0));
        let state = opening(42);
        let mut search =
            MCTSSearch::new(JaipurRules, quick()).with_simulation(SeatOneWins(Arc::clone(&calls)));
        search.search(&state, 60).unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), search.stats().simulations as usize);
        assert_eq!(search.stats().rollout_actions, 0);

        let visited: Vec<_> = search
            .tree()
            .root_node()
            .edges
            .iter()
            .filter(|e| e.visits > 0)
            .collect();
        assert!(!visited.is_empty());
        for edge in visited {
            assert_eq!(edge.mean_reward(PlayerId::new(1)), 1.0);
            assert_eq!(edge.mean_reward(PlayerId::new(0)), 0.0);
        }
    }

    #[test]
    fn test_finished_match_is_an_error() {
        let mut state = opening(1);
        state.status = crate::core::MatchStatus::Ended {
            winner: PlayerId::new(0),
        };
        let mut search = MCTSSearch::new(JaipurRules, quick());
        assert!(matches!(search.search(&state, 10), Err(EngineError::MatchEnded)));
    }
}
