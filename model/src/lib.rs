//! Aggraph Aggregate Model
//!
//! Domain operations over the schema graph:
//! - Node payloads (aggregates, scalar members) and the `Schema` handle
//! - Tree walks: root, parent, ancestors, descendants
//! - Member derivation: ordered members, keys, display names, inherited keys
//! - Variation groups and their discriminators
//! - Data-flow ordering of root aggregates
//! - Mermaid, JSON and TSV dumps

mod aggregate;
mod config;
mod dataflow;
mod dump;
mod member;
mod node;
mod schema;
mod variation;

pub use aggregate::AggregateNode;
pub use config::SchemaConfig;
pub use dataflow::order_by_data_flow;
pub use dump::{AggregateDump, EnumDump, MemberDump, SchemaDump};
pub use member::{
    InheritVia, Inheritance, Member, MemberKind, RelationMember, ValueMember, ValueSource,
    VariationItem,
};
pub use node::{
    Aggregate, Edge, EnumPresentation, MemberOptions, ModelKind, Node, ScalarMember,
    SchemaGraph, SchemaNode, TextWidth,
};
pub use schema::Schema;
pub use variation::VariationGroup;
