//! Relation-name paths between aggregates reached by walking the graph.

use aggraph_model::AggregateNode;

/// Relation names walked from the entry to `aggregate`.
///
/// `since` drops everything up to the last time the walk left that
/// aggregate; `until` cuts the walk where it first left that aggregate.
/// An aggregate the walk never left leaves the path untouched.
pub fn full_path<'g>(
    aggregate: &AggregateNode<'g>,
    since: Option<&AggregateNode<'g>>,
    until: Option<&AggregateNode<'g>>,
) -> Vec<&'g str> {
    let mut path = aggregate.path_from_entry();
    if let Some(since) = since {
        path = path.since(since.id());
    }
    if let Some(until) = until {
        path = path.until(until.id());
    }
    path.relation_names()
}
