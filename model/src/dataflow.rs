//! Data-flow ordering of root aggregates.

use crate::aggregate::AggregateNode;
use aggraph_core::{IntegrityError, IntegrityResult, NodeId};
use std::collections::HashSet;

/// Roots outside `root`'s tree that `root`'s tree refers to or depends on.
fn dependencies<'g>(root: &AggregateNode<'g>) -> Vec<NodeId> {
    let mut deps = Vec::new();
    for aggregate in root.this_and_descendants() {
        let edges = aggregate
            .reference_edges()
            .into_iter()
            .chain(aggregate.dependency_edges());
        for edge in edges {
            let target_root = AggregateNode::from_node(edge.terminal()).root();
            if target_root.id() != root.id() && !deps.contains(&target_root.id()) {
                deps.push(target_root.id());
            }
        }
    }
    deps
}

/// Order `roots` so that every root follows the roots its tree refers to.
///
/// Repeatedly emits the first remaining root, in input order, whose
/// dependencies inside `roots` are all emitted. References within one tree
/// and references to roots not in `roots` impose no constraint. If roots
/// remain but none can be emitted, the references form a cycle.
pub fn order_by_data_flow<'g>(roots: &[AggregateNode<'g>]) -> IntegrityResult<Vec<AggregateNode<'g>>> {
    let in_scope: HashSet<NodeId> = roots.iter().map(|r| r.id()).collect();
    let mut pending: Vec<(AggregateNode<'g>, Vec<NodeId>)> = roots
        .iter()
        .map(|r| {
            let deps = dependencies(r)
                .into_iter()
                .filter(|d| in_scope.contains(d))
                .collect();
            (r.clone(), deps)
        })
        .collect();

    let mut emitted: HashSet<NodeId> = HashSet::new();
    let mut ordered = Vec::with_capacity(pending.len());
    while !pending.is_empty() {
        let ready = pending
            .iter()
            .position(|(_, deps)| deps.iter().all(|d| emitted.contains(d)));
        let Some(index) = ready else {
            let remaining = pending
                .iter()
                .map(|(root, _)| root.path().to_string())
                .collect();
            return Err(IntegrityError::ReferenceCycle { remaining });
        };
        let (root, _) = pending.remove(index);
        emitted.insert(root.id());
        ordered.push(root);
    }
    Ok(ordered)
}
