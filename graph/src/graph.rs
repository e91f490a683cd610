//! Directed multigraph storage.

use crate::cursor::GraphNode;
use crate::index::AdjacencyIndex;
use aggraph_core::{EdgeId, GraphError, GraphResult, NodeId};
use std::collections::{BTreeMap, HashMap};

/// ID allocator for nodes and edges.
#[derive(Debug)]
struct IdAllocator {
    next_node_id: u64,
    next_edge_id: u64,
}

impl IdAllocator {
    fn new() -> Self {
        Self {
            next_node_id: 1,
            next_edge_id: 1,
        }
    }

    fn alloc_node_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    fn alloc_edge_id(&mut self) -> EdgeId {
        let id = EdgeId::new(self.next_edge_id);
        self.next_edge_id += 1;
        id
    }
}

/// A stored edge.
#[derive(Debug, Clone)]
pub struct EdgeData<E> {
    pub id: EdgeId,
    /// Source node.
    pub initial: NodeId,
    /// Target node.
    pub terminal: NodeId,
    /// Property name of the relation in derived views.
    pub relation_name: String,
    pub attrs: E,
}

impl<E> EdgeData<E> {
    /// The end of this edge that is not `node`. For a self-loop this is `node` itself.
    pub fn opposite(&self, node: NodeId) -> NodeId {
        if self.initial == node {
            self.terminal
        } else {
            self.initial
        }
    }
}

/// Directed multigraph whose nodes carry `N` payloads and edges carry `E` attributes.
///
/// Nodes and edges are never removed. Ids are allocated in creation order and
/// every enumeration below follows that order.
#[derive(Debug)]
pub struct DirectedGraph<N, E> {
    /// Node storage
    nodes: BTreeMap<NodeId, N>,
    /// Edge storage
    edges: HashMap<EdgeId, EdgeData<E>>,
    /// ID allocator
    id_alloc: IdAllocator,
    /// Adjacency index
    adj_index: AdjacencyIndex,
}

impl<N, E> Default for DirectedGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> DirectedGraph<N, E> {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: HashMap::new(),
            id_alloc: IdAllocator::new(),
            adj_index: AdjacencyIndex::new(),
        }
    }

    // ==================== Node Operations ====================

    /// Add a node holding `payload`.
    pub fn add_node(&mut self, payload: N) -> NodeId {
        let id = self.id_alloc.alloc_node_id();
        self.nodes.insert(id, payload);
        id
    }

    /// Get a node payload by ID.
    pub fn get_node(&self, id: NodeId) -> Option<&N> {
        self.nodes.get(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Cursor positioned on `id`, with `id` as its entry.
    pub fn node(&self, id: NodeId) -> GraphResult<GraphNode<'_, N, E>> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::NodeNotFound(id));
        }
        Ok(GraphNode::entry_at(self, id))
    }

    /// Cursors for every node, each its own entry.
    pub fn nodes(&self) -> impl Iterator<Item = GraphNode<'_, N, E>> + '_ {
        self.nodes.keys().map(move |id| GraphNode::entry_at(self, *id))
    }

    // ==================== Edge Operations ====================

    /// Get an edge by ID.
    pub fn get_edge(&self, id: EdgeId) -> Option<&EdgeData<E>> {
        self.edges.get(&id)
    }

    /// Outgoing edge ids of a node, in creation order.
    pub fn out_edge_ids(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.adj_index.outbound(node)
    }

    /// Incoming edge ids of a node, in creation order.
    pub fn in_edge_ids(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.adj_index.inbound(node)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All edges in creation order.
    pub fn edges(&self) -> Vec<&EdgeData<E>> {
        let mut edges: Vec<_> = self.edges.values().collect();
        edges.sort_by_key(|e| e.id);
        edges
    }
}

impl<N, E: PartialEq> DirectedGraph<N, E> {
    /// Add a directed edge.
    ///
    /// Several edges may connect the same pair of nodes as long as their
    /// relation names or attributes differ; an exact duplicate is rejected.
    pub fn add_edge(
        &mut self,
        initial: NodeId,
        terminal: NodeId,
        relation_name: impl Into<String>,
        attrs: E,
    ) -> GraphResult<EdgeId> {
        if !self.nodes.contains_key(&initial) {
            return Err(GraphError::NodeNotFound(initial));
        }
        if !self.nodes.contains_key(&terminal) {
            return Err(GraphError::NodeNotFound(terminal));
        }

        let relation_name = relation_name.into();
        let duplicate = self.adj_index.outbound(initial).any(|edge_id| {
            self.edges.get(&edge_id).is_some_and(|e| {
                e.terminal == terminal && e.relation_name == relation_name && e.attrs == attrs
            })
        });
        if duplicate {
            return Err(GraphError::DuplicateEdge {
                from: initial,
                to: terminal,
                relation: relation_name,
            });
        }

        let id = self.id_alloc.alloc_edge_id();
        tracing::trace!(%id, %initial, %terminal, relation = %relation_name, "add edge");
        self.adj_index.insert(id, initial, terminal);
        self.edges.insert(
            id,
            EdgeData {
                id,
                initial,
                terminal,
                relation_name,
                attrs,
            },
        );
        Ok(id)
    }
}
