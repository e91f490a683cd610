//! Navigation properties: both ends of every aggregate-to-aggregate relation.
//!
//! A composition edge navigates from the parent (principal) to the child
//! (relevant) and back through `Parent`. A reference edge navigates from the
//! referring aggregate (relevant) to the referred one (principal) and back
//! through a list named after the referrer and the relation.

use crate::foreign_key::ForeignKey;
use crate::path::full_path;
use aggraph_model::{AggregateNode, Edge, InheritVia};
use serde::Serialize;
use std::fmt;

/// Property name on the owned side of a composition.
pub const PARENT_PROPERTY_NAME: &str = "Parent";

/// How many instances a navigation property reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Multiplicity {
    One,
    Many,
}

impl Multiplicity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Multiplicity::One => "one",
            Multiplicity::Many => "many",
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Multiplicity::Many)
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What deleting the principal does to the relevant side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeleteBehavior {
    Cascade,
    NoAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationKind {
    Composition,
    Reference,
}

/// One side of a navigation: a property on `owner` reaching the other side.
#[derive(Clone, Debug)]
pub struct NavigationEnd<'g> {
    owner: AggregateNode<'g>,
    property_name: String,
    multiplicity: Multiplicity,
}

impl<'g> NavigationEnd<'g> {
    pub fn owner(&self) -> &AggregateNode<'g> {
        &self.owner
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// Instances of the other side this property reaches.
    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    /// Relation names walked to the owner, optionally since `since`, then the property.
    pub fn full_path(&self, since: Option<&AggregateNode<'g>>) -> Vec<String> {
        let mut path: Vec<String> = full_path(&self.owner, since, None)
            .into_iter()
            .map(str::to_string)
            .collect();
        path.push(self.property_name.clone());
        path
    }
}

/// Both ends of one composition or reference edge.
#[derive(Clone, Debug)]
pub struct NavigationProperty<'g> {
    edge: Edge<'g>,
    kind: NavigationKind,
    principal: NavigationEnd<'g>,
    relevant: NavigationEnd<'g>,
}

impl<'g> NavigationProperty<'g> {
    /// Navigation over a composition or reference edge; None for other edges.
    pub fn from_edge(edge: &Edge<'g>) -> Option<Self> {
        let attrs = edge.attrs();
        let initial = AggregateNode::try_from_node(edge.initial()).ok()?;
        let terminal = AggregateNode::try_from_node(edge.terminal()).ok()?;

        if attrs.is_composition() {
            let many = if attrs.multiple {
                Multiplicity::Many
            } else {
                Multiplicity::One
            };
            return Some(Self {
                edge: edge.clone(),
                kind: NavigationKind::Composition,
                principal: NavigationEnd {
                    owner: initial,
                    property_name: edge.relation_name().to_string(),
                    multiplicity: many,
                },
                relevant: NavigationEnd {
                    owner: terminal,
                    property_name: PARENT_PROPERTY_NAME.to_string(),
                    multiplicity: Multiplicity::One,
                },
            });
        }

        if attrs.is_reference() {
            let referred_side = if shares_identity(&initial, edge) {
                Multiplicity::One
            } else {
                Multiplicity::Many
            };
            return Some(Self {
                edge: edge.clone(),
                kind: NavigationKind::Reference,
                principal: NavigationEnd {
                    owner: terminal,
                    property_name: format!("{}_{}", initial.name(), edge.relation_name()),
                    multiplicity: referred_side,
                },
                relevant: NavigationEnd {
                    owner: initial,
                    property_name: edge.relation_name().to_string(),
                    multiplicity: Multiplicity::One,
                },
            });
        }

        None
    }

    pub fn edge(&self) -> &Edge<'g> {
        &self.edge
    }

    pub fn kind(&self) -> NavigationKind {
        self.kind
    }

    /// The side whose key the other side holds.
    pub fn principal(&self) -> &NavigationEnd<'g> {
        &self.principal
    }

    /// The side holding the foreign key.
    pub fn relevant(&self) -> &NavigationEnd<'g> {
        &self.relevant
    }

    /// The end owned by `aggregate`, if it takes part in this navigation.
    pub fn end_of(&self, aggregate: &AggregateNode<'g>) -> Option<&NavigationEnd<'g>> {
        if self.relevant.owner == *aggregate {
            Some(&self.relevant)
        } else if self.principal.owner == *aggregate {
            Some(&self.principal)
        } else {
            None
        }
    }

    /// The end opposite to `aggregate`.
    pub fn opposite_of(&self, aggregate: &AggregateNode<'g>) -> Option<&NavigationEnd<'g>> {
        if self.relevant.owner == *aggregate {
            Some(&self.principal)
        } else if self.principal.owner == *aggregate {
            Some(&self.relevant)
        } else {
            None
        }
    }

    pub fn delete_behavior(&self) -> DeleteBehavior {
        match self.kind {
            NavigationKind::Composition => DeleteBehavior::Cascade,
            NavigationKind::Reference => DeleteBehavior::NoAction,
        }
    }

    /// A relevant row cannot exist without its principal.
    pub fn is_required(&self) -> bool {
        match self.kind {
            NavigationKind::Composition => true,
            NavigationKind::Reference => {
                let attrs = self.edge.attrs();
                attrs.is_primary || attrs.is_required
            }
        }
    }

    pub fn foreign_key(&self) -> Option<ForeignKey<'g>> {
        ForeignKey::from_edge(&self.edge)
    }
}

/// The reference is the referrer's whole identity: it is primary and no key
/// column of the referrer comes from anywhere else.
fn shares_identity(referrer: &AggregateNode<'_>, edge: &Edge<'_>) -> bool {
    if !edge.attrs().is_primary {
        return false;
    }
    referrer.key_values().iter().all(|key| {
        matches!(
            key.inherits().map(|i| &i.via),
            Some(InheritVia::Ref(e)) if e.id() == edge.id()
        )
    })
}

/// Navigations `aggregate` takes part in: to its parent, to its children,
/// through its references, then from aggregates referring to it.
pub fn navigation_properties<'g>(aggregate: &AggregateNode<'g>) -> Vec<NavigationProperty<'g>> {
    let edges = aggregate
        .parent_edge()
        .into_iter()
        .chain(aggregate.child_edges())
        .chain(aggregate.reference_edges())
        .chain(aggregate.referred_edges());

    let mut navigations = Vec::new();
    for edge in edges {
        match NavigationProperty::from_edge(&edge) {
            Some(navigation) => navigations.push(navigation),
            None => tracing::debug!(
                aggregate = %aggregate.path(),
                relation = edge.relation_name(),
                "edge has no navigation"
            ),
        }
    }
    navigations
}
