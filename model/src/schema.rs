//! The compiled schema handle.

use crate::aggregate::AggregateNode;
use crate::config::SchemaConfig;
use crate::dataflow::order_by_data_flow;
use crate::node::{SchemaGraph, SchemaNode};
use aggraph_core::{IntegrityError, IntegrityResult, NodeId, RelationKind, TreePath};
use aggraph_registry::{EnumDefinition, MemberType, MemberTypeRegistry};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A finished, read-only schema: the aggregate graph plus its member types.
#[derive(Debug)]
pub struct Schema {
    application_name: String,
    config: SchemaConfig,
    graph: SchemaGraph,
    types: MemberTypeRegistry,
    /// Aggregate node by declaration path.
    aggregates_by_path: HashMap<TreePath, NodeId>,
}

impl Schema {
    /// Wrap a built graph, rejecting shapes that are unsafe to traverse.
    pub fn new(
        application_name: impl Into<String>,
        config: SchemaConfig,
        graph: SchemaGraph,
        types: MemberTypeRegistry,
    ) -> IntegrityResult<Self> {
        check_integrity(&graph)?;
        let aggregates_by_path = graph
            .node_ids()
            .filter_map(|id| match graph.get_node(id) {
                Some(SchemaNode::Aggregate(a)) => Some((a.path.clone(), id)),
                _ => None,
            })
            .collect();
        Ok(Self {
            application_name: application_name.into(),
            config,
            graph,
            types,
            aggregates_by_path,
        })
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    pub fn graph(&self) -> &SchemaGraph {
        &self.graph
    }

    // ==================== Aggregates ====================

    /// Root aggregates in declaration order.
    pub fn root_aggregates(&self) -> Vec<AggregateNode<'_>> {
        self.aggregate_nodes().filter(|a| a.is_root()).collect()
    }

    /// Every aggregate: each root followed by its descendants in pre-order.
    pub fn all_aggregates(&self) -> Vec<AggregateNode<'_>> {
        self.root_aggregates()
            .iter()
            .flat_map(|r| r.this_and_descendants())
            .collect()
    }

    /// Aggregate declared at `path`.
    pub fn aggregate(&self, path: &TreePath) -> Option<AggregateNode<'_>> {
        let id = self.aggregates_by_path.get(path)?;
        self.graph.node(*id).ok().map(AggregateNode::from_node)
    }

    /// First aggregate, in declaration order, whose entity name is `name`.
    pub fn find_aggregate(&self, name: &str) -> Option<AggregateNode<'_>> {
        self.aggregate_nodes().find(|a| a.name() == name)
    }

    fn aggregate_nodes(&self) -> impl Iterator<Item = AggregateNode<'_>> + '_ {
        self.graph
            .nodes()
            .filter(|n| matches!(n.item(), SchemaNode::Aggregate(_)))
            .map(AggregateNode::from_node)
    }

    /// Order roots so referenced trees come before the trees referring to them.
    pub fn data_flow_order<'s>(
        &'s self,
        roots: &[AggregateNode<'s>],
    ) -> IntegrityResult<Vec<AggregateNode<'s>>> {
        order_by_data_flow(roots)
    }

    // ==================== Member Types ====================

    pub fn member_types(&self) -> &MemberTypeRegistry {
        &self.types
    }

    /// Resolve a member type name. Case-sensitive exact match.
    pub fn resolve_member_type(&self, name: &str) -> Option<Arc<dyn MemberType>> {
        self.types.resolve(name)
    }

    /// Declared and synthesized enumerations, in registration order.
    pub fn enums(&self) -> &[Arc<EnumDefinition>] {
        self.types.enums()
    }

    // ==================== Export ====================

    /// Mermaid flowchart of the schema graph.
    pub fn to_mermaid(&self) -> String {
        self.graph.to_mermaid_with(
            |node| node.to_string(),
            |edge| match edge.attrs.relation {
                RelationKind::Having => "-->",
                RelationKind::Child => "==>",
                RelationKind::Reference | RelationKind::DependsOn => "-.->",
            },
        )
    }
}

/// Every aggregate has at most one parent and parent chains end at a root.
fn check_integrity(graph: &SchemaGraph) -> IntegrityResult<()> {
    let path_of = |id: NodeId| {
        graph
            .get_node(id)
            .map(|n| n.path().to_string())
            .unwrap_or_else(|| id.to_string())
    };
    let parent_edges = |id: NodeId| {
        graph
            .in_edge_ids(id)
            .filter_map(|e| graph.get_edge(e))
            .filter(|e| e.attrs.is_composition())
            .collect::<Vec<_>>()
    };

    for id in graph.node_ids() {
        if !matches!(graph.get_node(id), Some(SchemaNode::Aggregate(_))) {
            continue;
        }
        let parents = parent_edges(id);
        if parents.len() > 1 {
            return Err(IntegrityError::multiple_parents(
                path_of(id),
                parents.iter().map(|e| path_of(e.initial)).collect(),
            ));
        }
    }

    for id in graph.node_ids() {
        let mut seen = HashSet::new();
        let mut current = id;
        while let Some(edge) = parent_edges(current).first() {
            if !seen.insert(current) {
                return Err(IntegrityError::composition_cycle(path_of(id)));
            }
            current = edge.initial;
        }
    }
    Ok(())
}
