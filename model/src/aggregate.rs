//! Aggregate-level walks and classification.

use crate::node::{Aggregate, Edge, ModelKind, Node, SchemaNode};
use crate::variation::VariationGroup;
use aggraph_core::{EdgeAttrs, GraphResult, NodeId, TreePath};
use aggraph_graph::GraphPath;
use std::fmt;

/// A graph cursor known to sit on an aggregate node.
///
/// Equality is node identity; the walked path is carried along so that
/// members reached from here can report their path from the entry.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AggregateNode<'g> {
    node: Node<'g>,
}

impl<'g> AggregateNode<'g> {
    /// Checked wrap of a cursor.
    pub fn try_from_node(node: Node<'g>) -> GraphResult<Self> {
        node.try_narrow::<Aggregate>()?;
        Ok(Self { node })
    }

    /// Wrap a cursor whose payload is an aggregate by construction.
    ///
    /// # Panics
    /// Panics if the payload is not an aggregate.
    pub fn from_node(node: Node<'g>) -> Self {
        node.narrow::<Aggregate>();
        Self { node }
    }

    pub fn node(&self) -> &Node<'g> {
        &self.node
    }

    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    pub fn item(&self) -> &'g Aggregate {
        self.node.narrow::<Aggregate>()
    }

    pub fn name(&self) -> &'g str {
        &self.item().name
    }

    pub fn path(&self) -> &'g TreePath {
        &self.item().path
    }

    /// Same aggregate as a fresh entry with an empty walked path.
    pub fn as_entry(&self) -> Self {
        Self {
            node: self.node.as_entry(),
        }
    }

    pub fn path_from_entry(&self) -> GraphPath<'g, SchemaNode, EdgeAttrs> {
        self.node.path_from_entry()
    }

    // ==================== Tree Walks ====================

    /// The composition edge from the parent, if any.
    pub fn parent_edge(&self) -> Option<Edge<'g>> {
        self.node
            .in_edges()
            .into_iter()
            .find(|e| e.attrs().is_composition())
    }

    pub fn parent(&self) -> Option<AggregateNode<'g>> {
        self.parent_edge()
            .map(|e| AggregateNode::from_node(e.initial()))
    }

    pub fn is_root(&self) -> bool {
        self.parent_edge().is_none()
    }

    pub fn root(&self) -> AggregateNode<'g> {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Composition edges from the root down to this aggregate, root side first.
    pub fn ancestor_edges(&self) -> Vec<Edge<'g>> {
        let mut edges = Vec::new();
        let mut current = self.clone();
        while let Some(edge) = current.parent_edge() {
            current = AggregateNode::from_node(edge.initial());
            edges.push(edge);
        }
        edges.reverse();
        edges
    }

    /// Ancestors, root first, excluding this aggregate.
    pub fn ancestors(&self) -> Vec<AggregateNode<'g>> {
        self.ancestor_edges()
            .into_iter()
            .map(|e| AggregateNode::from_node(e.initial()))
            .collect()
    }

    /// Ancestors, root first, then this aggregate.
    pub fn this_and_ancestors(&self) -> Vec<AggregateNode<'g>> {
        let mut all = self.ancestors();
        all.push(self.clone());
        all
    }

    /// Composition edges to direct children, in declaration order.
    pub fn child_edges(&self) -> Vec<Edge<'g>> {
        let mut edges: Vec<Edge<'g>> = self
            .node
            .out_edges()
            .into_iter()
            .filter(|e| e.attrs().is_composition())
            .collect();
        edges.sort_by_key(|e| (e.attrs().member_order, e.id()));
        edges
    }

    /// Descendants in pre-order, excluding this aggregate.
    pub fn descendants(&self) -> Vec<AggregateNode<'g>> {
        let mut result = Vec::new();
        for edge in self.child_edges() {
            let child = AggregateNode::from_node(edge.terminal());
            let below = child.descendants();
            result.push(child);
            result.extend(below);
        }
        result
    }

    /// This aggregate, then its descendants in pre-order.
    pub fn this_and_descendants(&self) -> Vec<AggregateNode<'g>> {
        let mut all = vec![self.clone()];
        all.extend(self.descendants());
        all
    }

    /// True if this aggregate belongs to the tree `target` belongs to.
    pub fn is_in_tree_of(&self, target: &AggregateNode<'g>) -> bool {
        target.root().this_and_descendants().contains(self)
    }

    // ==================== Classification ====================

    /// Owned by its parent as one element of a repeated collection.
    pub fn is_children_member(&self) -> bool {
        self.parent_edge().is_some_and(|e| e.attrs().multiple)
    }

    /// Owned by its parent as a single, unconditional child.
    pub fn is_child_member(&self) -> bool {
        self.parent_edge()
            .is_some_and(|e| !e.attrs().multiple && !e.attrs().is_variation())
    }

    /// Owned by its parent as one case of a variation group.
    pub fn is_variation_member(&self) -> bool {
        self.parent_edge().is_some_and(|e| e.attrs().is_variation())
    }

    /// Model kind of the tree this aggregate belongs to.
    pub fn model(&self) -> Option<ModelKind> {
        self.root().item().model
    }

    /// Instances are persisted.
    pub fn is_stored(&self) -> bool {
        self.model() == Some(ModelKind::WriteModel)
    }

    // ==================== Relations ====================

    /// Outgoing reference edges, in declaration order.
    pub fn reference_edges(&self) -> Vec<Edge<'g>> {
        let mut edges: Vec<Edge<'g>> = self
            .node
            .out_edges()
            .into_iter()
            .filter(|e| e.attrs().is_reference())
            .collect();
        edges.sort_by_key(|e| (e.attrs().member_order, e.id()));
        edges
    }

    /// Incoming reference edges from other aggregates.
    pub fn referred_edges(&self) -> Vec<Edge<'g>> {
        self.node
            .in_edges()
            .into_iter()
            .filter(|e| e.attrs().is_reference())
            .filter(|e| matches!(e.initial().item(), SchemaNode::Aggregate(_)))
            .collect()
    }

    /// Outgoing depends-on edges.
    pub fn dependency_edges(&self) -> Vec<Edge<'g>> {
        self.node
            .out_edges()
            .into_iter()
            .filter(|e| e.attrs().is_depends_on())
            .collect()
    }

    /// Scalar member edges, in declaration order.
    pub fn having_edges(&self) -> Vec<Edge<'g>> {
        let mut edges: Vec<Edge<'g>> = self
            .node
            .out_edges()
            .into_iter()
            .filter(|e| e.attrs().is_having())
            .collect();
        edges.sort_by_key(|e| (e.attrs().member_order, e.id()));
        edges
    }

    /// Variation groups declared directly under this aggregate.
    pub fn variation_groups(&self) -> Vec<VariationGroup<'g>> {
        VariationGroup::cluster(self)
    }
}

impl fmt::Debug for AggregateNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AggregateNode({} {})", self.id(), self.path())
    }
}

impl fmt::Display for AggregateNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
