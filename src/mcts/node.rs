//! Tree nodes and edges.
//!
//! Nodes of the searching seat list every legal action when they are
//! created. Nodes of the other seats start bare and gain an edge the first
//! time the opponent policy plays a reply there, so their edge visits count
//! how often each reply was sampled.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Action, PlayerId, PlayerMap};

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// No node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Arena index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Who decides at a node, and how its edges are filled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// The searching seat moves. Every legal action is an edge.
    Decision,
    /// Another seat moves. Edges are the replies sampled so far.
    Sampled,
    /// The match is over, with a reward per seat.
    Terminal(PlayerMap<f64>),
}

/// One action out of a node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub action: Action,
    /// `NONE` until the child is created.
    pub child: NodeId,
    pub visits: u32,
    /// Reward summed per seat over all traversals.
    pub total_reward: PlayerMap<f64>,
    /// PUCT prior, 1.0 when uniform.
    pub prior: f32,
}

impl Edge {
    /// Unvisited edge with a uniform prior.
    #[must_use]
    pub fn new(action: Action, player_count: usize) -> Self {
        Self {
            action,
            child: NodeId::NONE,
            visits: 0,
            total_reward: PlayerMap::with_value(player_count, 0.0),
            prior: 1.0,
        }
    }

    /// Mean reward for `player`, 0 when unvisited.
    #[must_use]
    pub fn mean_reward(&self, player: PlayerId) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward[player] / f64::from(self.visits)
        }
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        !self.child.is_none()
    }

    /// Count one traversal worth `rewards`.
    pub fn record(&mut self, rewards: &PlayerMap<f64>) {
        self.visits += 1;
        for (player, reward) in rewards.iter() {
            self.total_reward[player] += reward;
        }
    }
}

/// A position in the tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode {
    /// `NONE` for the root.
    pub parent: NodeId,
    pub to_move: PlayerId,
    /// Actions from the root.
    pub depth: u16,
    pub visits: u32,
    pub kind: NodeKind,
    /// Most Jaipur positions offer under a dozen actions.
    pub edges: SmallVec<[Edge; 8]>,
}

impl MCTSNode {
    /// Bare decision node; the search fills in its kind and edges.
    #[must_use]
    pub fn new(parent: NodeId, to_move: PlayerId, depth: u16) -> Self {
        Self {
            parent,
            to_move,
            depth,
            visits: 0,
            kind: NodeKind::Decision,
            edges: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn root(to_move: PlayerId) -> Self {
        Self::new(NodeId::NONE, to_move, 0)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, NodeKind::Terminal(_))
    }

    /// True for nodes whose edges come from the opponent policy.
    #[must_use]
    pub fn is_sampled(&self) -> bool {
        self.kind == NodeKind::Sampled
    }

    /// Seat rewards of a finished match.
    #[must_use]
    pub fn terminal_reward(&self) -> Option<&PlayerMap<f64>> {
        match &self.kind {
            NodeKind::Terminal(rewards) => Some(rewards),
            _ => None,
        }
    }

    /// Make this a decision node over `actions`.
    pub fn list_actions(&mut self, actions: impl IntoIterator<Item = Action>, player_count: usize) {
        self.kind = NodeKind::Decision;
        self.edges = actions
            .into_iter()
            .map(|action| Edge::new(action, player_count))
            .collect();
    }

    /// Edge for a sampled reply, appended the first time it is seen.
    pub fn sampled_edge(&mut self, action: Action, player_count: usize) -> usize {
        if let Some(idx) = self.edges.iter().position(|e| e.action == action) {
            return idx;
        }
        self.edges.push(Edge::new(action, player_count));
        self.edges.len() - 1
    }

    #[must_use]
    pub fn has_unexpanded(&self) -> bool {
        self.edges.iter().any(|e| !e.is_expanded())
    }

    pub fn unexpanded_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_expanded())
            .map(|(i, _)| i)
    }

    /// Most visited edge; the first one wins ties.
    #[must_use]
    pub fn best_edge_by_visits(&self) -> Option<&Edge> {
        self.edges
            .iter()
            .reduce(|best, e| if e.visits > best.visits { e } else { best })
    }
}
