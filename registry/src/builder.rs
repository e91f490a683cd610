//! RegistryBuilder for constructing an immutable MemberTypeRegistry.

use crate::{builtin_types, EnumDefinition, EnumType, MemberType, MemberTypeRegistry};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during registry construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Duplicate member type name: {0}")]
    DuplicateTypeName(String),

    #[error("Enum '{0}' has no items")]
    EmptyEnum(String),

    #[error("Enum '{enum_name}' declares item '{item}' more than once")]
    DuplicateEnumItem { enum_name: String, item: String },

    #[error("Enum '{enum_name}' uses value {value} more than once")]
    DuplicateEnumValue { enum_name: String, value: i64 },
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Builder for constructing an immutable MemberTypeRegistry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    /// Types by name.
    types: HashMap<String, Arc<dyn MemberType>>,
    /// Enumerations in registration order.
    enums: Vec<Arc<EnumDefinition>>,
}

impl RegistryBuilder {
    /// Create a builder with no types at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder holding the built-in value types.
    pub fn with_builtins() -> Self {
        let mut builder = Self::new();
        for ty in builtin_types() {
            builder
                .types
                .insert(ty.name.clone(), Arc::new(ty) as Arc<dyn MemberType>);
        }
        builder
    }

    /// Register a member type under its own name.
    pub fn register(&mut self, ty: Arc<dyn MemberType>) -> RegistryResult<()> {
        let name = ty.name().to_string();
        if self.types.contains_key(&name) {
            return Err(RegistryError::DuplicateTypeName(name));
        }
        tracing::debug!(name = %name, "register member type");
        self.types.insert(name, ty);
        Ok(())
    }

    /// Register an enumeration, making it usable as a member type.
    pub fn register_enum(&mut self, definition: EnumDefinition) -> RegistryResult<Arc<EnumDefinition>> {
        let definition = Arc::new(definition);
        self.register(Arc::new(EnumType::new(definition.clone())))?;
        self.enums.push(definition.clone());
        Ok(definition)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Look up a type registered so far.
    pub fn get(&self, name: &str) -> Option<Arc<dyn MemberType>> {
        self.types.get(name).cloned()
    }

    /// Build the immutable registry.
    pub fn build(self) -> MemberTypeRegistry {
        MemberTypeRegistry::new(self.types, self.enums)
    }
}
