//! Monte Carlo Tree Search over Jaipur matches.
//!
//! ## Overview
//!
//! - **Public-state MCTS**: only the searching player's turns branch over
//!   every legal action; other seats are sampled from an opponent policy
//! - **N-player**: rewards are kept per player on every edge
//! - **Configurable policies**: selection (UCB1/PUCT), rollouts, opponents
//! - **Deterministic**: the same seed and state always give the same action
//!
//! Searches run on clones of the state, which is cheap thanks to the
//! persistent collections inside `GameState`.
//!
//! ## Usage
//!
//! ```rust
//! use rust_jaipur::core::JaipurConfig;
//! use rust_jaipur::mcts::{MCTSConfig, MCTSSearch};
//! use rust_jaipur::rules::{new_match, JaipurRules};
//!
//! let state = new_match(JaipurConfig::default(), 2, 7).unwrap();
//! let config = MCTSConfig::default().with_rollout_depth(30);
//! let mut search = MCTSSearch::new(JaipurRules, config);
//!
//! let action = search.search(&state, 50).unwrap();
//! for (candidate, prob) in search.action_probabilities() {
//!     println!("{candidate}: {:.1}%", prob * 100.0);
//! }
//! # let _ = action;
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

pub use config::MCTSConfig;
pub use node::{Edge, MCTSNode, NodeId, NodeKind};
pub use policy::{
    heuristic_eval, result_to_rewards, OpponentPolicy, RandomSimulation, Rollout,
    SelectionPolicy, SimulationPolicy, UniformOpponent, PUCT, UCB1,
};
pub use search::MCTSSearch;
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
