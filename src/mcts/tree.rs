//! Arena-backed search tree.

use serde::{Deserialize, Serialize};

use super::node::{MCTSNode, NodeId};
use crate::core::PlayerId;

/// Search tree stored as a flat `Vec<MCTSNode>`. The root is node 0.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree {
    nodes: Vec<MCTSNode>,
    player_count: usize,
}

impl MCTSTree {
    /// Tree holding only a root, with room for `capacity` nodes.
    #[must_use]
    pub fn new(root_player: PlayerId, player_count: usize, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(MCTSNode::root(root_player));
        Self {
            nodes,
            player_count,
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.index()]
    }

    /// Append a node and return its ID.
    pub fn alloc(&mut self, node: MCTSNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Seats in the searched match.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Start over from a new root, keeping the allocation.
    pub fn reset(&mut self, root_player: PlayerId, player_count: usize) {
        self.nodes.clear();
        self.nodes.push(MCTSNode::root(root_player));
        self.player_count = player_count;
    }

    #[must_use]
    pub fn root_node(&self) -> &MCTSNode {
        self.get(self.root())
    }

    pub fn root_node_mut(&mut self) -> &mut MCTSNode {
        let root = self.root();
        self.get_mut(root)
    }

    /// Shape summary of the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let sampled = self.nodes.iter().filter(|n| n.is_sampled());
        TreeStats {
            node_count: self.nodes.len(),
            max_depth: self.nodes.iter().map(|n| n.depth).max().unwrap_or(0),
            terminal_count: self.nodes.iter().filter(|n| n.is_terminal()).count(),
            sampled_count: sampled.clone().count(),
            sampled_replies: sampled.clone().map(|n| n.edges.len()).sum(),
            widest_sampled: sampled.map(|n| n.edges.len()).max().unwrap_or(0),
        }
    }
}

/// Shape of a search tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: u16,
    pub terminal_count: usize,
    /// Nodes where another seat moves.
    pub sampled_count: usize,
    /// Distinct opponent replies seen, over all sampled nodes.
    pub sampled_replies: usize,
    /// Most distinct replies seen at one sampled node.
    pub widest_sampled: usize,
}

impl TreeStats {
    /// Mean distinct replies per sampled node.
    #[must_use]
    pub fn replies_per_sampled(&self) -> f64 {
        if self.sampled_count == 0 {
            0.0
        } else {
            self.sampled_replies as f64 / self.sampled_count as f64
        }
    }
}
