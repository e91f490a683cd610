//! Member derivation: the ordered view of everything under an aggregate.
//!
//! Members are computed from the graph on every call and never stored;
//! within one call each aggregate's key list is derived once.
//! Order: each member sorts by the declaration counter of the edge that
//! introduces it; members inherited through a relation follow that relation
//! in the order the related aggregate lists its keys.

use crate::aggregate::AggregateNode;
use crate::node::{Edge, MemberOptions, Node, ScalarMember};
use crate::variation::VariationGroup;
use aggraph_core::NodeId;
use aggraph_registry::{EnumType, MemberType};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Classification of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemberKind {
    Parent,
    Scalar,
    Children,
    Child,
    Variation,
    VariationItem,
    Ref,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Parent => "parent",
            MemberKind::Scalar => "scalar",
            MemberKind::Children => "children",
            MemberKind::Child => "child",
            MemberKind::Variation => "variation",
            MemberKind::VariationItem => "variation-item",
            MemberKind::Ref => "ref",
        }
    }

    /// Tie-break between members sharing a declaration counter.
    fn rank(&self) -> u8 {
        match self {
            MemberKind::Parent => 0,
            MemberKind::Scalar => 1,
            MemberKind::Children => 2,
            MemberKind::Child => 3,
            MemberKind::Variation => 4,
            MemberKind::VariationItem => 5,
            MemberKind::Ref => 6,
        }
    }
}

/// Relation a value member was inherited through.
#[derive(Clone, Debug)]
pub enum InheritVia<'g> {
    /// Composition edge from the parent.
    Parent(Edge<'g>),
    /// Reference edge to the referred aggregate.
    Ref(Edge<'g>),
}

impl<'g> InheritVia<'g> {
    pub fn edge(&self) -> &Edge<'g> {
        match self {
            InheritVia::Parent(e) | InheritVia::Ref(e) => e,
        }
    }

    /// Prefix of inherited member names: the parent's name, or the reference name.
    pub fn prefix(&self) -> &'g str {
        match self {
            InheritVia::Parent(e) => {
                let parent = AggregateNode::from_node(e.initial());
                parent.name()
            }
            InheritVia::Ref(e) => e.relation_name(),
        }
    }
}

/// The member an inherited member mirrors.
#[derive(Clone, Debug)]
pub struct Inheritance<'g> {
    pub via: InheritVia<'g>,
    pub member: ValueMember<'g>,
}

/// What backs a value member.
#[derive(Clone, Debug)]
pub enum ValueSource<'g> {
    /// A declared scalar node.
    Scalar(Node<'g>),
    /// The synthesized discriminator of a variation group.
    Switch(VariationGroup<'g>),
}

/// A column-like member: declared scalar, discriminator, or inherited key.
#[derive(Clone, Debug)]
pub struct ValueMember<'g> {
    owner: AggregateNode<'g>,
    source: ValueSource<'g>,
    options: MemberOptions,
    inherits: Option<Box<Inheritance<'g>>>,
}

impl<'g> ValueMember<'g> {
    pub fn owner(&self) -> &AggregateNode<'g> {
        &self.owner
    }

    pub fn source(&self) -> &ValueSource<'g> {
        &self.source
    }

    pub fn options(&self) -> &MemberOptions {
        &self.options
    }

    pub fn member_type(&self) -> &Arc<dyn MemberType> {
        &self.options.member_type
    }

    pub fn inherits(&self) -> Option<&Inheritance<'g>> {
        self.inherits.as_deref()
    }

    pub fn is_inherited(&self) -> bool {
        self.inherits.is_some()
    }

    pub fn is_variation_switch(&self) -> bool {
        matches!(self.source, ValueSource::Switch(_))
    }

    pub fn is_key(&self) -> bool {
        self.options.is_key
    }

    pub fn is_display_name(&self) -> bool {
        self.options.is_display_name
    }

    pub fn is_required(&self) -> bool {
        self.options.is_required
    }

    /// Name within the owner: `<prefix>_<name>` once per inheritance hop.
    pub fn member_name(&self) -> String {
        match &self.inherits {
            Some(inherit) => format!("{}_{}", inherit.via.prefix(), inherit.member.member_name()),
            None => self.options.name.clone(),
        }
    }

    /// The member as declared, following inheritance to its origin.
    pub fn declared(&self) -> &ValueMember<'g> {
        let mut current = self;
        while let Some(inherit) = &current.inherits {
            current = &inherit.member;
        }
        current
    }

    /// Aggregate the member is declared in.
    pub fn declaring_aggregate(&self) -> &AggregateNode<'g> {
        self.declared().owner()
    }
}

impl PartialEq for ValueMember<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.member_name() == other.member_name()
    }
}

/// A member that points at another aggregate.
#[derive(Clone, Debug, PartialEq)]
pub struct RelationMember<'g> {
    owner: AggregateNode<'g>,
    edge: Edge<'g>,
    is_parent: bool,
}

impl<'g> RelationMember<'g> {
    pub fn owner(&self) -> &AggregateNode<'g> {
        &self.owner
    }

    pub fn edge(&self) -> &Edge<'g> {
        &self.edge
    }

    /// The aggregate on the other end.
    pub fn target(&self) -> AggregateNode<'g> {
        if self.is_parent {
            AggregateNode::from_node(self.edge.initial())
        } else {
            AggregateNode::from_node(self.edge.terminal())
        }
    }

    /// Property name: the parent's name for a parent member, else the relation name.
    pub fn name(&self) -> &'g str {
        if self.is_parent {
            self.target().name()
        } else {
            self.edge.relation_name()
        }
    }

    pub fn is_primary(&self) -> bool {
        self.edge.attrs().is_primary
    }

    pub fn is_required(&self) -> bool {
        self.edge.attrs().is_required
    }

    pub fn is_instance_name(&self) -> bool {
        self.edge.attrs().is_instance_name
    }
}

/// One case of a variation group.
#[derive(Clone, Debug)]
pub struct VariationItem<'g> {
    group: VariationGroup<'g>,
    edge: Edge<'g>,
}

impl<'g> VariationItem<'g> {
    pub fn group(&self) -> &VariationGroup<'g> {
        &self.group
    }

    pub fn edge(&self) -> &Edge<'g> {
        &self.edge
    }

    /// Tag selecting this case.
    pub fn key(&self) -> &'g str {
        self.edge.attrs().variation_key.as_deref().unwrap_or_default()
    }

    pub fn target(&self) -> AggregateNode<'g> {
        AggregateNode::from_node(self.edge.terminal())
    }
}

/// Anything enumerable under an aggregate.
#[derive(Clone, Debug)]
pub enum Member<'g> {
    Parent(RelationMember<'g>),
    Value(ValueMember<'g>),
    Children(RelationMember<'g>),
    Child(RelationMember<'g>),
    Variation(ValueMember<'g>),
    VariationItem(VariationItem<'g>),
    Ref(RelationMember<'g>),
}

impl<'g> Member<'g> {
    pub fn kind(&self) -> MemberKind {
        match self {
            Member::Parent(_) => MemberKind::Parent,
            Member::Value(_) => MemberKind::Scalar,
            Member::Children(_) => MemberKind::Children,
            Member::Child(_) => MemberKind::Child,
            Member::Variation(_) => MemberKind::Variation,
            Member::VariationItem(_) => MemberKind::VariationItem,
            Member::Ref(_) => MemberKind::Ref,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Member::Value(v) | Member::Variation(v) => v.member_name(),
            Member::Parent(r) | Member::Children(r) | Member::Child(r) | Member::Ref(r) => {
                r.name().to_string()
            }
            Member::VariationItem(i) => i.edge.relation_name().to_string(),
        }
    }

    pub fn as_value(&self) -> Option<&ValueMember<'g>> {
        match self {
            Member::Value(v) | Member::Variation(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_relation(&self) -> Option<&RelationMember<'g>> {
        match self {
            Member::Parent(r) | Member::Children(r) | Member::Child(r) | Member::Ref(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Display for Member<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.kind().as_str())
    }
}

type SortKey = (u32, u32, u8);

// ==================== Derivation ====================

/// Which members a derivation step needs.
#[derive(Clone, Copy, PartialEq, Eq)]
enum MemberScope {
    All,
    /// Only what contributes key values: non-primary references are skipped.
    Keys,
}

/// Memo and recursion stack of one derivation call.
///
/// A result that depended on a cut cycle is not memoized.
struct Derivation<'g> {
    done: HashMap<NodeId, Vec<ValueMember<'g>>>,
    stack: Vec<NodeId>,
    cuts: usize,
}

impl<'g> Derivation<'g> {
    fn new() -> Self {
        Self {
            done: HashMap::new(),
            stack: Vec::new(),
            cuts: 0,
        }
    }
}

impl<'g> AggregateNode<'g> {
    /// All members in their documented order.
    pub fn members(&self) -> Vec<Member<'g>> {
        self.collect_members(MemberScope::All, &mut Derivation::new())
    }

    /// Identity members: key values, primary references and the parent.
    pub fn keys(&self) -> Vec<Member<'g>> {
        self.members()
            .into_iter()
            .filter(|m| match m {
                Member::Value(v) | Member::Variation(v) => v.is_key(),
                Member::Ref(r) => r.is_primary(),
                Member::Parent(_) => true,
                _ => false,
            })
            .collect()
    }

    /// Key columns: own keys plus keys inherited from the parent and primary references.
    pub fn key_values(&self) -> Vec<ValueMember<'g>> {
        key_values_of(self.collect_members(MemberScope::Keys, &mut Derivation::new()))
    }

    /// Members naming an instance for humans.
    ///
    /// Own members flagged display name; otherwise the display members of
    /// references flagged primary or display name; otherwise the keys.
    pub fn display_members(&self) -> Vec<ValueMember<'g>> {
        self.collect_display_members(&mut Derivation::new())
    }

    fn collect_display_members(&self, cx: &mut Derivation<'g>) -> Vec<ValueMember<'g>> {
        if let Some(shown) = cx.done.get(&self.id()) {
            return shown.clone();
        }
        let members = self.members();

        let own: Vec<ValueMember<'g>> = members
            .iter()
            .filter_map(Member::as_value)
            .filter(|v| !v.is_inherited() && v.is_display_name())
            .cloned()
            .collect();
        if !own.is_empty() {
            return own;
        }

        let cuts = cx.cuts;
        cx.stack.push(self.id());
        let mut through_refs = Vec::new();
        for member in &members {
            let Member::Ref(relation) = member else {
                continue;
            };
            if !relation.is_primary() && !relation.is_instance_name() {
                continue;
            }
            let target = relation.target();
            if cx.stack.contains(&target.id()) {
                tracing::warn!(aggregate = %self.path(), target = %target.path(), "display name reference cycle");
                cx.cuts += 1;
                continue;
            }
            for shown in target.collect_display_members(cx) {
                let mut options = shown.options.clone();
                options.is_display_name = true;
                through_refs.push(ValueMember {
                    owner: self.clone(),
                    source: shown.source.clone(),
                    options,
                    inherits: Some(Box::new(Inheritance {
                        via: InheritVia::Ref(relation.edge.clone()),
                        member: shown,
                    })),
                });
            }
        }
        cx.stack.pop();

        let shown = if through_refs.is_empty() {
            self.key_values()
        } else {
            through_refs
        };
        if cx.cuts == cuts {
            cx.done.insert(self.id(), shown.clone());
        }
        shown
    }

    fn collect_members(&self, scope: MemberScope, cx: &mut Derivation<'g>) -> Vec<Member<'g>> {
        let mut entries: Vec<(SortKey, Member<'g>)> = Vec::new();

        if let Some(edge) = self.parent_edge() {
            let order = edge.attrs().member_order;
            let parent = AggregateNode::from_node(edge.initial());
            let inherited = self.inherit_keys(&parent, InheritVia::Parent(edge.clone()), cx);
            entries.push((
                (order, 0, MemberKind::Parent.rank()),
                Member::Parent(RelationMember {
                    owner: self.clone(),
                    edge,
                    is_parent: true,
                }),
            ));
            push_inherited(&mut entries, order, inherited);
        }

        for edge in self.having_edges() {
            let node = edge.terminal();
            let scalar = node.narrow::<ScalarMember>();
            entries.push((
                (edge.attrs().member_order, 0, MemberKind::Scalar.rank()),
                Member::Value(ValueMember {
                    owner: self.clone(),
                    source: ValueSource::Scalar(node),
                    options: scalar.options.clone(),
                    inherits: None,
                }),
            ));
        }

        for edge in self.child_edges() {
            if edge.attrs().is_variation() {
                continue;
            }
            let relation = RelationMember {
                owner: self.clone(),
                edge: edge.clone(),
                is_parent: false,
            };
            let order = edge.attrs().member_order;
            if edge.attrs().multiple {
                entries.push(((order, 0, MemberKind::Children.rank()), Member::Children(relation)));
            } else {
                entries.push(((order, 0, MemberKind::Child.rank()), Member::Child(relation)));
            }
        }

        for group in self.variation_groups() {
            let order = group.member_order();
            let switch_type: Arc<dyn MemberType> =
                Arc::new(EnumType::new(Arc::new(group.enum_definition())));
            let mut options = MemberOptions::new(group.name(), switch_type);
            options.is_key = group.is_primary();
            options.is_required = group.is_primary() || group.is_required();
            entries.push((
                (order, 0, MemberKind::Variation.rank()),
                Member::Variation(ValueMember {
                    owner: self.clone(),
                    source: ValueSource::Switch(group.clone()),
                    options,
                    inherits: None,
                }),
            ));
            for (i, edge) in group.edges().iter().enumerate() {
                entries.push((
                    (order, i as u32 + 1, MemberKind::VariationItem.rank()),
                    Member::VariationItem(VariationItem {
                        group: group.clone(),
                        edge: edge.clone(),
                    }),
                ));
            }
        }

        for edge in self.reference_edges() {
            if scope == MemberScope::Keys && !edge.attrs().is_primary {
                continue;
            }
            let order = edge.attrs().member_order;
            let target = AggregateNode::from_node(edge.terminal());
            let inherited = self.inherit_keys(&target, InheritVia::Ref(edge.clone()), cx);
            entries.push((
                (order, 0, MemberKind::Ref.rank()),
                Member::Ref(RelationMember {
                    owner: self.clone(),
                    edge,
                    is_parent: false,
                }),
            ));
            push_inherited(&mut entries, order, inherited);
        }

        entries.sort_by_key(|(key, _)| *key);
        entries.into_iter().map(|(_, member)| member).collect()
    }

    /// Key values as mirrored by aggregates inheriting them.
    ///
    /// Follows only the parent and primary references, so the recursion
    /// revisits an aggregate only through a key cycle.
    fn derive_keys(&self, cx: &mut Derivation<'g>) -> Vec<ValueMember<'g>> {
        if let Some(keys) = cx.done.get(&self.id()) {
            return keys.clone();
        }
        let cuts = cx.cuts;
        cx.stack.push(self.id());
        let keys = key_values_of(self.collect_members(MemberScope::Keys, cx));
        cx.stack.pop();
        if cx.cuts == cuts {
            cx.done.insert(self.id(), keys.clone());
        }
        keys
    }

    /// Mirror `target`'s key values onto this aggregate.
    fn inherit_keys(
        &self,
        target: &AggregateNode<'g>,
        via: InheritVia<'g>,
        cx: &mut Derivation<'g>,
    ) -> Vec<Member<'g>> {
        if cx.stack.contains(&target.id()) {
            tracing::warn!(
                aggregate = %self.path(),
                target = %target.path(),
                "key inheritance cycle, inherited keys omitted"
            );
            cx.cuts += 1;
            return Vec::new();
        }

        target
            .derive_keys(cx)
            .into_iter()
            .map(|key| {
                let mut options = key.options.clone();
                match &via {
                    InheritVia::Parent(_) => {
                        options.is_key = true;
                        options.is_required = true;
                        options.is_display_name = true;
                    }
                    InheritVia::Ref(edge) => {
                        let attrs = edge.attrs();
                        options.is_key = attrs.is_primary;
                        options.is_required = attrs.is_primary || attrs.is_required;
                        options.is_display_name = attrs.is_instance_name;
                    }
                }
                let is_switch = key.is_variation_switch();
                let member = ValueMember {
                    owner: self.clone(),
                    source: key.source.clone(),
                    options,
                    inherits: Some(Box::new(Inheritance {
                        via: via.clone(),
                        member: key,
                    })),
                };
                if is_switch {
                    Member::Variation(member)
                } else {
                    Member::Value(member)
                }
            })
            .collect()
    }
}

fn key_values_of<'g>(members: Vec<Member<'g>>) -> Vec<ValueMember<'g>> {
    members
        .into_iter()
        .filter_map(|m| match m {
            Member::Value(v) | Member::Variation(v) if v.is_key() => Some(v),
            _ => None,
        })
        .collect()
}

fn push_inherited<'g>(entries: &mut Vec<(SortKey, Member<'g>)>, order: u32, inherited: Vec<Member<'g>>) {
    for (i, member) in inherited.into_iter().enumerate() {
        let rank = member.kind().rank();
        entries.push(((order, i as u32 + 1, rank), member));
    }
}
