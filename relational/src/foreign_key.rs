//! Foreign keys carried by composition and reference edges.

use crate::column::Column;
use aggraph_model::{AggregateNode, Edge, InheritVia, Member};

/// A dependent column and the principal column it mirrors.
#[derive(Clone, Debug)]
pub struct ForeignKeyColumn<'g> {
    pub column: Column<'g>,
    pub principal: Column<'g>,
}

/// Columns of `dependent` that identify a row of `principal`.
#[derive(Clone, Debug)]
pub struct ForeignKey<'g> {
    edge: Edge<'g>,
    principal: AggregateNode<'g>,
    dependent: AggregateNode<'g>,
    columns: Vec<ForeignKeyColumn<'g>>,
}

impl<'g> ForeignKey<'g> {
    /// Foreign key introduced by a composition or reference edge.
    ///
    /// For a composition the child depends on the parent; for a reference
    /// the referring aggregate depends on the referred one. Other edges
    /// carry no foreign key.
    pub fn from_edge(edge: &Edge<'g>) -> Option<Self> {
        let attrs = edge.attrs();
        let initial = AggregateNode::try_from_node(edge.initial()).ok()?;
        let terminal = AggregateNode::try_from_node(edge.terminal()).ok()?;
        let (principal, dependent) = if attrs.is_composition() {
            (initial, terminal)
        } else if attrs.is_reference() {
            (terminal, initial)
        } else {
            return None;
        };

        let columns = dependent
            .members()
            .into_iter()
            .filter_map(|m| match m {
                Member::Value(v) | Member::Variation(v) => Some(v),
                _ => None,
            })
            .filter_map(|v| {
                let inherit = v.inherits()?;
                let through_edge = match &inherit.via {
                    InheritVia::Parent(e) => attrs.is_composition() && e.id() == edge.id(),
                    InheritVia::Ref(e) => attrs.is_reference() && e.id() == edge.id(),
                };
                through_edge.then(|| ForeignKeyColumn {
                    principal: Column::new(inherit.member.clone()),
                    column: Column::new(v.clone()),
                })
            })
            .collect();

        Some(Self {
            edge: edge.clone(),
            principal,
            dependent,
            columns,
        })
    }

    pub fn edge(&self) -> &Edge<'g> {
        &self.edge
    }

    pub fn principal(&self) -> &AggregateNode<'g> {
        &self.principal
    }

    pub fn dependent(&self) -> &AggregateNode<'g> {
        &self.dependent
    }

    /// Column pairs in the principal's key order.
    pub fn columns(&self) -> &[ForeignKeyColumn<'g>] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.column.name()).collect()
    }
}

/// Foreign keys held by `aggregate`: to its parent, then to each referred aggregate.
pub fn foreign_keys<'g>(aggregate: &AggregateNode<'g>) -> Vec<ForeignKey<'g>> {
    aggregate
        .parent_edge()
        .into_iter()
        .chain(aggregate.reference_edges())
        .filter_map(|e| ForeignKey::from_edge(&e))
        .collect()
}
