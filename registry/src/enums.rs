//! Enumeration definitions.

use crate::RegistryError;
use std::collections::HashSet;

/// Where an enumeration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumOrigin {
    /// Written as an `enum` element.
    Declared,
    /// Synthesized from a variation group of the aggregate at `owner`.
    VariationGroup { owner: String, group: String },
}

/// One symbolic value of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumItem {
    pub name: String,
    pub value: i64,
    pub display_name: Option<String>,
}

/// An item as declared, before values are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumItemDecl {
    pub name: String,
    pub value: Option<i64>,
    pub display_name: Option<String>,
}

impl EnumItemDecl {
    pub fn new(name: impl Into<String>, value: Option<i64>) -> Self {
        Self {
            name: name.into(),
            value,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

/// A named set of symbolic/integer value pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDefinition {
    pub name: String,
    pub items: Vec<EnumItem>,
    pub origin: EnumOrigin,
}

impl EnumDefinition {
    /// Validate declared items and assign missing values.
    ///
    /// Items without a value take the lowest non-negative integer not used by
    /// any explicit value or any earlier assignment, in declaration order.
    pub fn try_new(
        name: impl Into<String>,
        decls: Vec<EnumItemDecl>,
        origin: EnumOrigin,
    ) -> Result<Self, Vec<RegistryError>> {
        let name = name.into();
        let mut errors = Vec::new();

        if decls.is_empty() {
            errors.push(RegistryError::EmptyEnum(name.clone()));
        }

        let mut names = HashSet::new();
        for decl in &decls {
            if !names.insert(decl.name.as_str()) {
                errors.push(RegistryError::DuplicateEnumItem {
                    enum_name: name.clone(),
                    item: decl.name.clone(),
                });
            }
        }

        let mut used = HashSet::new();
        for value in decls.iter().filter_map(|d| d.value) {
            if !used.insert(value) {
                errors.push(RegistryError::DuplicateEnumValue {
                    enum_name: name.clone(),
                    value,
                });
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let mut next_free = 0i64;
        let items = decls
            .into_iter()
            .map(|decl| {
                let value = match decl.value {
                    Some(value) => value,
                    None => {
                        while used.contains(&next_free) {
                            next_free += 1;
                        }
                        used.insert(next_free);
                        next_free
                    }
                };
                EnumItem {
                    name: decl.name,
                    value,
                    display_name: decl.display_name,
                }
            })
            .collect();

        Ok(Self {
            name,
            items,
            origin,
        })
    }

    pub fn item(&self, name: &str) -> Option<&EnumItem> {
        self.items.iter().find(|i| i.name == name)
    }

    pub fn values(&self) -> Vec<i64> {
        self.items.iter().map(|i| i.value).collect()
    }
}
