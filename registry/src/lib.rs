//! Aggraph Member Type Registry
//!
//! This crate provides the lookup from a member type name, as written in a
//! declaration, to the behavior renderers rely on:
//! - Value types with search semantics and a primitive kind
//! - Enumerations, declared or synthesized for variation groups
//! - RegistryBuilder for constructing an immutable MemberTypeRegistry

mod builder;
mod enums;
mod registry;
mod types;

pub use builder::*;
pub use enums::*;
pub use registry::*;
pub use types::*;
