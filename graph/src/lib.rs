//! Aggraph Graph Substrate
//!
//! A generic directed multigraph:
//! - Nodes carry a payload and a stable id
//! - Edges carry a relation name and an attribute value
//! - Path-aware cursors record how a node was reached from an entry node
//! - Payload narrowing through the `Narrow` trait
//! - Mermaid export

mod cursor;
mod graph;
mod index;
mod mermaid;
mod narrow;

pub use cursor::{GraphEdge, GraphNode, GraphPath};
pub use graph::{DirectedGraph, EdgeData};
pub use narrow::Narrow;
