//! Edge attribute vocabulary.
//!
//! Graph edges carry no meaning of their own; everything the aggregate model
//! knows about a relation comes from the fixed set of attributes below.

use serde::Serialize;
use std::fmt;

/// What an edge means between its two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    /// Aggregate owns a scalar member node.
    Having,
    /// Parent aggregate composes a child aggregate.
    Child,
    /// Aggregate refers to an aggregate, usually in another tree.
    Reference,
    /// Root aggregate depends on another root without holding a reference.
    DependsOn,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Having => "having",
            RelationKind::Child => "child",
            RelationKind::Reference => "reference",
            RelationKind::DependsOn => "depends-on",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Well-known attribute keys, used when attributes are rendered as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKey {
    RelationType,
    Multiple,
    VariationGroupName,
    VariationKey,
    IsPrimary,
    IsInstanceName,
    IsNameLike,
    IsRequired,
    InvisibleInGui,
    MemberOrder,
}

impl AttrKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttrKey::RelationType => "relationType",
            AttrKey::Multiple => "multiple",
            AttrKey::VariationGroupName => "variation-group-name",
            AttrKey::VariationKey => "switch",
            AttrKey::IsPrimary => "is-primary",
            AttrKey::IsInstanceName => "is-instance-name",
            AttrKey::IsNameLike => "is-name-like",
            AttrKey::IsRequired => "is-required",
            AttrKey::InvisibleInGui => "invisible-in-gui",
            AttrKey::MemberOrder => "member-order",
        }
    }
}

/// Attributes attached to an edge at construction time.
///
/// Flags default to `false` and optional values to `None`, so an edge only
/// states what was declared for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeAttrs {
    pub relation: RelationKind,
    /// Composition to a repeated-children member.
    pub multiple: bool,
    /// Discriminator group shared by sibling variants.
    pub variation_group: Option<String>,
    /// Tag of this variant within its group.
    pub variation_key: Option<String>,
    /// Participates in the owner's identity.
    pub is_primary: bool,
    /// Used as the owner's display name.
    pub is_instance_name: bool,
    pub is_name_like: bool,
    pub is_required: bool,
    pub invisible_in_gui: bool,
    /// Declaration counter of the member this edge introduces.
    pub member_order: u32,
}

impl EdgeAttrs {
    /// Create attributes for a relation with every flag unset.
    pub fn new(relation: RelationKind) -> Self {
        Self {
            relation,
            multiple: false,
            variation_group: None,
            variation_key: None,
            is_primary: false,
            is_instance_name: false,
            is_name_like: false,
            is_required: false,
            invisible_in_gui: false,
            member_order: 0,
        }
    }

    pub fn having() -> Self {
        Self::new(RelationKind::Having)
    }

    pub fn child() -> Self {
        Self::new(RelationKind::Child)
    }

    pub fn reference() -> Self {
        Self::new(RelationKind::Reference)
    }

    pub fn depends_on() -> Self {
        Self::new(RelationKind::DependsOn)
    }

    // ==================== Builders ====================

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn variation(mut self, group: impl Into<String>, key: impl Into<String>) -> Self {
        self.variation_group = Some(group.into());
        self.variation_key = Some(key.into());
        self
    }

    pub fn primary(mut self, value: bool) -> Self {
        self.is_primary = value;
        self
    }

    pub fn instance_name(mut self, value: bool) -> Self {
        self.is_instance_name = value;
        self
    }

    pub fn name_like(mut self, value: bool) -> Self {
        self.is_name_like = value;
        self
    }

    pub fn required(mut self, value: bool) -> Self {
        self.is_required = value;
        self
    }

    pub fn invisible(mut self, value: bool) -> Self {
        self.invisible_in_gui = value;
        self
    }

    pub fn order(mut self, order: u32) -> Self {
        self.member_order = order;
        self
    }

    // ==================== Predicates ====================

    pub fn is_having(&self) -> bool {
        self.relation == RelationKind::Having
    }

    pub fn is_composition(&self) -> bool {
        self.relation == RelationKind::Child
    }

    pub fn is_reference(&self) -> bool {
        self.relation == RelationKind::Reference
    }

    pub fn is_depends_on(&self) -> bool {
        self.relation == RelationKind::DependsOn
    }

    /// Composition edge that belongs to a variation group.
    pub fn is_variation(&self) -> bool {
        self.is_composition()
            && self
                .variation_group
                .as_deref()
                .is_some_and(|group| !group.is_empty())
    }

    /// Attributes that differ from their unset value, as key/value text.
    pub fn entries(&self) -> Vec<(AttrKey, String)> {
        let mut entries = vec![(AttrKey::RelationType, self.relation.to_string())];
        let flags = [
            (AttrKey::Multiple, self.multiple),
            (AttrKey::IsPrimary, self.is_primary),
            (AttrKey::IsInstanceName, self.is_instance_name),
            (AttrKey::IsNameLike, self.is_name_like),
            (AttrKey::IsRequired, self.is_required),
            (AttrKey::InvisibleInGui, self.invisible_in_gui),
        ];
        for (key, set) in flags {
            if set {
                entries.push((key, "true".to_string()));
            }
        }
        if let Some(group) = &self.variation_group {
            entries.push((AttrKey::VariationGroupName, group.clone()));
        }
        if let Some(key) = &self.variation_key {
            entries.push((AttrKey::VariationKey, key.clone()));
        }
        entries.push((AttrKey::MemberOrder, self.member_order.to_string()));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== TEST: variation_requires_group ==========
    #[test]
    fn test_variation_requires_group() {
        // GIVEN a composition with and without a group name
        let plain = EdgeAttrs::child();
        let variant = EdgeAttrs::child().variation("Payment", "1");
        let empty_group = EdgeAttrs::child().variation("", "1");

        // THEN only the named group counts as a variation
        assert!(!plain.is_variation());
        assert!(variant.is_variation());
        assert!(!empty_group.is_variation());
    }

    // ========== TEST: equality_distinguishes_attributes ==========
    #[test]
    fn test_equality_distinguishes_attributes() {
        let a = EdgeAttrs::reference().order(3);
        let b = EdgeAttrs::reference().order(3).primary(true);
        assert_ne!(a, b);
        assert_eq!(a, EdgeAttrs::reference().order(3));
    }

    // ========== TEST: entries_list_only_set_flags ==========
    #[test]
    fn test_entries_list_only_set_flags() {
        let attrs = EdgeAttrs::child().multiple().order(2);
        let keys: Vec<&str> = attrs.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["relationType", "multiple", "member-order"]);
    }
}
