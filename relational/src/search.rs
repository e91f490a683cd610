//! Search fields of a root aggregate's tree.

use crate::column::{columns, Column};
use aggraph_model::AggregateNode;
use aggraph_registry::SearchBehavior;

/// A value member a search screen over the root can filter on.
#[derive(Clone, Debug)]
pub struct SearchField<'g> {
    column: Column<'g>,
    path: Vec<String>,
    is_many: bool,
}

impl<'g> SearchField<'g> {
    pub fn column(&self) -> &Column<'g> {
        &self.column
    }

    /// Relation names from the root, then the column name.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn name(&self) -> String {
        self.path.join(".")
    }

    pub fn search_behavior(&self) -> SearchBehavior {
        self.column.member().member_type().search_behavior()
    }

    /// The path crosses a repeated-children edge: one root row may match
    /// through several values.
    pub fn is_many(&self) -> bool {
        self.is_many
    }
}

/// Every value member reachable from `root` through compositions.
///
/// Keys mirrored from a parent are skipped; they repeat a column already
/// listed higher up the tree.
pub fn search_fields<'g>(root: &AggregateNode<'g>) -> Vec<SearchField<'g>> {
    let mut fields = Vec::new();
    for aggregate in root.as_entry().this_and_descendants() {
        let walked = aggregate.path_from_entry();
        let is_many = walked.edges().iter().any(|e| e.attrs().multiple);
        let relations: Vec<String> = walked
            .relation_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        for column in columns(&aggregate) {
            if column.is_parent_key() {
                continue;
            }
            let mut path = relations.clone();
            path.push(column.name());
            fields.push(SearchField {
                column,
                path,
                is_many,
            });
        }
    }
    fields
}
