//! Variation groups: tagged unions of sibling child aggregates.

use crate::aggregate::AggregateNode;
use crate::node::Edge;
use aggraph_registry::{EnumDefinition, EnumItem, EnumOrigin};
use indexmap::IndexMap;

/// Sibling aggregates sharing one discriminator under a common owner.
#[derive(Clone, Debug)]
pub struct VariationGroup<'g> {
    owner: AggregateNode<'g>,
    name: String,
    edges: Vec<Edge<'g>>,
}

impl<'g> VariationGroup<'g> {
    /// Cluster the owner's variation edges by group name, in order of first appearance.
    pub(crate) fn cluster(owner: &AggregateNode<'g>) -> Vec<Self> {
        let mut groups: IndexMap<String, Vec<Edge<'g>>> = IndexMap::new();
        for edge in owner.child_edges() {
            if !edge.attrs().is_variation() {
                continue;
            }
            if let Some(group) = &edge.attrs().variation_group {
                groups.entry(group.clone()).or_default().push(edge);
            }
        }
        groups
            .into_iter()
            .map(|(name, edges)| Self {
                owner: owner.clone(),
                name,
                edges,
            })
            .collect()
    }

    pub fn owner(&self) -> &AggregateNode<'g> {
        &self.owner
    }

    /// Discriminator name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn edges(&self) -> &[Edge<'g>] {
        &self.edges
    }

    /// The edge the discriminator takes its flags from.
    fn first(&self) -> &Edge<'g> {
        // Groups are only created from at least one edge.
        &self.edges[0]
    }

    pub fn is_primary(&self) -> bool {
        self.first().attrs().is_primary
    }

    pub fn is_required(&self) -> bool {
        self.first().attrs().is_required
    }

    pub fn member_order(&self) -> u32 {
        self.first().attrs().member_order
    }

    /// Variant aggregates with their tags, in declaration order.
    pub fn variants(&self) -> Vec<(String, AggregateNode<'g>)> {
        self.edges
            .iter()
            .map(|e| {
                let key = e.attrs().variation_key.clone().unwrap_or_default();
                (key, AggregateNode::from_node(e.terminal()))
            })
            .collect()
    }

    /// Name of the enumeration that lists the valid tags.
    pub fn enum_name(&self) -> String {
        format!("E_{}", self.name)
    }

    /// The discriminator's value set: one item per variant, valued by its tag.
    ///
    /// Tags that are not integers take their position in the group.
    pub fn enum_definition(&self) -> EnumDefinition {
        let items = self
            .variants()
            .into_iter()
            .enumerate()
            .map(|(i, (key, aggregate))| EnumItem {
                name: aggregate.name().to_string(),
                value: key.parse().unwrap_or(i as i64),
                display_name: aggregate.item().display_name.clone(),
            })
            .collect();
        EnumDefinition {
            name: self.enum_name(),
            items,
            origin: EnumOrigin::VariationGroup {
                owner: self.owner.path().to_string(),
                group: self.name.clone(),
            },
        }
    }
}
