//! Priority-resolved candidate facts.
//!
//! Every flag proposes values for properties. A `Force` value must win; an
//! `IfNotSpecified` value only applies when nothing forces the property.
//! Two different forced values for one property are a conflict and leave
//! the property unset.

use indexmap::IndexMap;
use std::hash::Hash;

/// How strongly a candidate claims its property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Force,
    IfNotSpecified,
}

/// A proposed value for one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<P, V> {
    pub property: P,
    pub value: V,
    pub priority: Priority,
}

impl<P, V> Candidate<P, V> {
    pub fn force(property: P, value: V) -> Self {
        Self {
            property,
            value,
            priority: Priority::Force,
        }
    }

    pub fn if_not_specified(property: P, value: V) -> Self {
        Self {
            property,
            value,
            priority: Priority::IfNotSpecified,
        }
    }
}

/// Distinct forced values proposed for one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict<P, V> {
    pub property: P,
    pub values: Vec<V>,
}

/// Outcome of resolving a candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<P: Hash + Eq, V> {
    values: IndexMap<P, V>,
    conflicts: Vec<Conflict<P, V>>,
}

impl<P: Hash + Eq, V> Resolved<P, V> {
    pub fn get(&self, property: &P) -> Option<&V> {
        self.values.get(property)
    }

    /// Resolved values in order of each property's first candidate.
    pub fn values(&self) -> impl Iterator<Item = (&P, &V)> {
        self.values.iter()
    }

    pub fn conflicts(&self) -> &[Conflict<P, V>] {
        &self.conflicts
    }
}

/// Resolve candidates property by property.
///
/// Per property: two or more distinct `Force` values are a conflict; exactly
/// one `Force` value wins; otherwise the first `IfNotSpecified` value wins;
/// otherwise the property stays unset.
pub fn resolve_candidates<P, V>(candidates: &[Candidate<P, V>]) -> Resolved<P, V>
where
    P: Copy + Hash + Eq,
    V: Clone + PartialEq,
{
    let mut grouped: IndexMap<P, Vec<&Candidate<P, V>>> = IndexMap::new();
    for candidate in candidates {
        grouped.entry(candidate.property).or_default().push(candidate);
    }

    let mut values = IndexMap::new();
    let mut conflicts = Vec::new();
    for (property, group) in grouped {
        let mut forced: Vec<&V> = Vec::new();
        for candidate in group.iter().filter(|c| c.priority == Priority::Force) {
            if !forced.contains(&&candidate.value) {
                forced.push(&candidate.value);
            }
        }

        match forced.as_slice() {
            [] => {
                if let Some(fallback) = group
                    .iter()
                    .find(|c| c.priority == Priority::IfNotSpecified)
                {
                    values.insert(property, fallback.value.clone());
                }
            }
            [only] => {
                values.insert(property, (*only).clone());
            }
            _ => conflicts.push(Conflict {
                property,
                values: forced.into_iter().cloned().collect(),
            }),
        }
    }

    Resolved { values, conflicts }
}
