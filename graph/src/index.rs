//! Adjacency index for graph edges.

use aggraph_core::{EdgeId, NodeId};
use std::collections::{BTreeSet, HashMap};

/// Index from node to incident edges, split by direction.
///
/// Edge sets are ordered by id, so adjacency is reported in creation order.
#[derive(Debug, Default)]
pub struct AdjacencyIndex {
    /// Edges leaving the node
    outbound: HashMap<NodeId, BTreeSet<EdgeId>>,
    /// Edges entering the node
    inbound: HashMap<NodeId, BTreeSet<EdgeId>>,
}

impl AdjacencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, edge_id: EdgeId, initial: NodeId, terminal: NodeId) {
        self.outbound.entry(initial).or_default().insert(edge_id);
        self.inbound.entry(terminal).or_default().insert(edge_id);
    }

    pub fn outbound(&self, node_id: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.outbound
            .get(&node_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn inbound(&self, node_id: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.inbound
            .get(&node_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}
