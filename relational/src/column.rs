//! Column identity of value members.

use crate::path::full_path;
use aggraph_model::{AggregateNode, InheritVia, Member, ValueMember};
use aggraph_registry::PrimitiveKind;
use std::fmt;

/// A value member seen as a persisted column of its owner.
#[derive(Clone, Debug)]
pub struct Column<'g> {
    member: ValueMember<'g>,
}

impl<'g> Column<'g> {
    pub fn new(member: ValueMember<'g>) -> Self {
        Self { member }
    }

    pub fn member(&self) -> &ValueMember<'g> {
        &self.member
    }

    pub fn owner(&self) -> &AggregateNode<'g> {
        self.member.owner()
    }

    /// Column name within the owner.
    ///
    /// A declared member uses its `DbName` when given, else its name. An
    /// inherited member prefixes the column name of the member it mirrors,
    /// once per hop, so inherited columns never collide with own ones.
    pub fn name(&self) -> String {
        column_name(&self.member)
    }

    /// Relation names walked from the entry, then the column name.
    pub fn qualified_name(&self) -> String {
        let mut segments: Vec<String> = full_path(self.owner(), None, None)
            .into_iter()
            .map(str::to_string)
            .collect();
        segments.push(self.name());
        segments.join(".")
    }

    pub fn is_key(&self) -> bool {
        self.member.is_key()
    }

    pub fn is_nullable(&self) -> bool {
        !self.member.is_required()
    }

    /// Mirrors a key of the parent aggregate.
    pub fn is_parent_key(&self) -> bool {
        matches!(
            self.member.inherits().map(|i| &i.via),
            Some(InheritVia::Parent(_))
        )
    }

    pub fn primitive_kind(&self) -> PrimitiveKind {
        self.member.member_type().primitive_kind()
    }

    pub fn type_name(&self) -> &str {
        self.member.member_type().name()
    }
}

impl fmt::Display for Column<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner().name(), self.name())
    }
}

fn column_name(member: &ValueMember<'_>) -> String {
    match member.inherits() {
        Some(inherit) => format!("{}_{}", inherit.via.prefix(), column_name(&inherit.member)),
        None => member
            .options()
            .db_name
            .clone()
            .unwrap_or_else(|| member.member_name()),
    }
}

/// Columns of an aggregate, in member order.
pub fn columns<'g>(aggregate: &AggregateNode<'g>) -> Vec<Column<'g>> {
    aggregate
        .members()
        .into_iter()
        .filter_map(|m| match m {
            Member::Value(v) | Member::Variation(v) => Some(Column::new(v)),
            _ => None,
        })
        .collect()
}
