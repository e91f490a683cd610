//! The MemberTypeRegistry - immutable member type lookup.

use crate::{EnumDefinition, MemberType};
use std::collections::HashMap;
use std::sync::Arc;

/// Lookup from member type name to behavior.
/// It is immutable after construction.
#[derive(Debug, Clone)]
pub struct MemberTypeRegistry {
    /// Types by name.
    types: HashMap<String, Arc<dyn MemberType>>,
    /// Enumerations in registration order.
    enums: Vec<Arc<EnumDefinition>>,
}

impl MemberTypeRegistry {
    /// Create a registry (use RegistryBuilder for construction).
    pub(crate) fn new(
        types: HashMap<String, Arc<dyn MemberType>>,
        enums: Vec<Arc<EnumDefinition>>,
    ) -> Self {
        Self { types, enums }
    }

    // ==================== Type Lookups ====================

    /// Resolve a type name. Case-sensitive exact match.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn MemberType>> {
        self.types.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// All type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    // ==================== Enum Lookups ====================

    /// Enumerations in registration order.
    pub fn enums(&self) -> &[Arc<EnumDefinition>] {
        &self.enums
    }

    pub fn get_enum(&self, name: &str) -> Option<&Arc<EnumDefinition>> {
        self.enums.iter().find(|e| e.name == name)
    }
}
