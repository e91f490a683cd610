//! Path-aware cursors over a `DirectedGraph`.
//!
//! A `GraphNode` is a position in the graph plus the edges walked to reach it
//! from an entry node. Walking across an edge extends that path; walking back
//! onto a node already on the path truncates it, so the recorded path is
//! always simple.

use crate::graph::{DirectedGraph, EdgeData};
use crate::narrow::Narrow;
use aggraph_core::{EdgeId, GraphError, GraphResult, NodeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A node reached from an entry node along a recorded path.
///
/// Equality and hashing consider the node identity only, not the path.
pub struct GraphNode<'g, N, E> {
    graph: &'g DirectedGraph<N, E>,
    id: NodeId,
    entry: NodeId,
    path: Vec<EdgeId>,
}

impl<N, E> Clone for GraphNode<'_, N, E> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph,
            id: self.id,
            entry: self.entry,
            path: self.path.clone(),
        }
    }
}

impl<'g, N, E> GraphNode<'g, N, E> {
    pub(crate) fn entry_at(graph: &'g DirectedGraph<N, E>, id: NodeId) -> Self {
        Self {
            graph,
            id,
            entry: id,
            path: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn graph(&self) -> &'g DirectedGraph<N, E> {
        self.graph
    }

    /// Payload of this node.
    pub fn item(&self) -> &'g N {
        // Cursors are only created for nodes that exist and nodes are never removed.
        match self.graph.get_node(self.id) {
            Some(item) => item,
            None => unreachable!("cursor points at missing node {}", self.id),
        }
    }

    /// Checked narrowing of the payload.
    pub fn try_narrow<T>(&self) -> GraphResult<&'g T>
    where
        N: Narrow<T>,
    {
        self.item().narrow().ok_or(GraphError::PayloadMismatch {
            node: self.id,
            expected: <N as Narrow<T>>::KIND,
        })
    }

    /// Narrowing for call sites that know the payload kind statically.
    ///
    /// # Panics
    /// Panics if the payload is of another kind.
    pub fn narrow<T>(&self) -> &'g T
    where
        N: Narrow<T>,
    {
        match self.try_narrow() {
            Ok(item) => item,
            Err(err) => panic!("{}", err),
        }
    }

    /// Same node, made the entry of a fresh empty path.
    pub fn as_entry(&self) -> Self {
        Self::entry_at(self.graph, self.id)
    }

    /// The entry node this cursor's path starts from.
    pub fn entry(&self) -> Self {
        Self::entry_at(self.graph, self.entry)
    }

    pub fn is_entry(&self) -> bool {
        self.path.is_empty()
    }

    /// The edge walked last to reach this node, if any.
    pub fn source(&self) -> Option<GraphEdge<'g, N, E>> {
        self.path_from_entry().edges.pop()
    }

    /// Edges walked from the entry to this node, entry side first.
    pub fn path_from_entry(&self) -> GraphPath<'g, N, E> {
        let mut edges = Vec::with_capacity(self.path.len());
        let mut current = self.entry();
        for (i, edge_id) in self.path.iter().enumerate() {
            let next = self.data(*edge_id).opposite(current.id);
            edges.push(GraphEdge {
                from: current.clone(),
                id: *edge_id,
            });
            current = Self {
                graph: self.graph,
                id: next,
                entry: self.entry,
                path: self.path[..=i].to_vec(),
            };
        }
        GraphPath { edges }
    }

    /// Outgoing edges, in creation order.
    pub fn out_edges(&self) -> Vec<GraphEdge<'g, N, E>> {
        self.graph
            .out_edge_ids(self.id)
            .map(|id| GraphEdge {
                from: self.clone(),
                id,
            })
            .collect()
    }

    /// Incoming edges, in creation order.
    pub fn in_edges(&self) -> Vec<GraphEdge<'g, N, E>> {
        self.graph
            .in_edge_ids(self.id)
            .map(|id| GraphEdge {
                from: self.clone(),
                id,
            })
            .collect()
    }

    /// Pre-order walk over nodes reachable through edges accepted by `follow`,
    /// starting with (but not yielding) `self`. Each node is yielded once.
    pub fn select_neighbors<F>(&self, mut follow: F) -> Vec<Self>
    where
        F: FnMut(&GraphNode<'g, N, E>) -> Vec<GraphNode<'g, N, E>>,
    {
        let mut visited = vec![self.id];
        let mut result = Vec::new();
        let mut stack: Vec<Self> = follow(self).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if visited.contains(&node.id) {
                continue;
            }
            visited.push(node.id);
            let mut next = follow(&node);
            next.reverse();
            result.push(node);
            stack.extend(next);
        }
        result
    }

    fn data(&self, edge_id: EdgeId) -> &'g EdgeData<E> {
        match self.graph.get_edge(edge_id) {
            Some(data) => data,
            None => unreachable!("cursor path holds missing edge {}", edge_id),
        }
    }

    /// Node ids along the path, entry first and `self` last.
    fn trail(&self) -> Vec<NodeId> {
        let mut trail = Vec::with_capacity(self.path.len() + 1);
        let mut current = self.entry;
        trail.push(current);
        for edge_id in &self.path {
            current = self.data(*edge_id).opposite(current);
            trail.push(current);
        }
        trail
    }

    /// Cursor reached by crossing `edge_id` to `to`.
    fn walk(&self, edge_id: EdgeId, to: NodeId) -> Self {
        if to == self.id {
            return self.clone();
        }
        let mut path = self.path.clone();
        match self.trail().iter().position(|n| *n == to) {
            Some(index) => path.truncate(index),
            None => path.push(edge_id),
        }
        Self {
            graph: self.graph,
            id: to,
            entry: self.entry,
            path,
        }
    }
}

impl<N, E> PartialEq for GraphNode<'_, N, E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<N, E> Eq for GraphNode<'_, N, E> {}

impl<N, E> Hash for GraphNode<'_, N, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<N: fmt::Debug, E> fmt::Debug for GraphNode<'_, N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphNode")
            .field("id", &self.id)
            .field("entry", &self.entry)
            .field("path", &self.path)
            .field("item", self.item())
            .finish()
    }
}

/// An edge seen from the node the walk was at when it was taken.
pub struct GraphEdge<'g, N, E> {
    from: GraphNode<'g, N, E>,
    id: EdgeId,
}

impl<N, E> Clone for GraphEdge<'_, N, E> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            id: self.id,
        }
    }
}

impl<'g, N, E> GraphEdge<'g, N, E> {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn data(&self) -> &'g EdgeData<E> {
        self.from.data(self.id)
    }

    pub fn attrs(&self) -> &'g E {
        &self.data().attrs
    }

    pub fn relation_name(&self) -> &'g str {
        &self.data().relation_name
    }

    /// The cursor this edge was enumerated from.
    pub fn from(&self) -> &GraphNode<'g, N, E> {
        &self.from
    }

    /// Source node, reached through this edge.
    pub fn initial(&self) -> GraphNode<'g, N, E> {
        self.from.walk(self.id, self.data().initial)
    }

    /// Target node, reached through this edge.
    pub fn terminal(&self) -> GraphNode<'g, N, E> {
        self.from.walk(self.id, self.data().terminal)
    }
}

impl<N, E> PartialEq for GraphEdge<'_, N, E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<N, E> Eq for GraphEdge<'_, N, E> {}

impl<N, E> Hash for GraphEdge<'_, N, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<N, E: fmt::Debug> fmt::Debug for GraphEdge<'_, N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data();
        f.debug_struct("GraphEdge")
            .field("id", &self.id)
            .field("initial", &data.initial)
            .field("terminal", &data.terminal)
            .field("relation_name", &data.relation_name)
            .field("attrs", &data.attrs)
            .finish()
    }
}

/// A walked sequence of edges.
pub struct GraphPath<'g, N, E> {
    edges: Vec<GraphEdge<'g, N, E>>,
}

impl<N, E> Clone for GraphPath<'_, N, E> {
    fn clone(&self) -> Self {
        Self {
            edges: self.edges.clone(),
        }
    }
}

impl<'g, N, E> GraphPath<'g, N, E> {
    pub fn edges(&self) -> &[GraphEdge<'g, N, E>] {
        &self.edges
    }

    pub fn into_edges(self) -> Vec<GraphEdge<'g, N, E>> {
        self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn relation_names(&self) -> Vec<&'g str> {
        self.edges.iter().map(|e| e.relation_name()).collect()
    }

    /// Part of the path walked after leaving `node`'s last visit.
    pub fn since(&self, node: NodeId) -> Self {
        match self.edges.iter().rposition(|e| e.from.id == node) {
            Some(index) => Self {
                edges: self.edges[index..].to_vec(),
            },
            None => self.clone(),
        }
    }

    /// Part of the path walked until `node` was first reached.
    pub fn until(&self, node: NodeId) -> Self {
        match self.edges.iter().position(|e| e.from.id == node) {
            Some(index) => Self {
                edges: self.edges[..index].to_vec(),
            },
            None => self.clone(),
        }
    }
}
