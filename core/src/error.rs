//! Error types shared across crates.

use crate::{EdgeId, NodeId};
use thiserror::Error;

/// Errors raised by the graph substrate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    #[error("Duplicate edge '{relation}' from {from} to {to}")]
    DuplicateEdge {
        from: NodeId,
        to: NodeId,
        relation: String,
    },

    #[error("Node {node} payload is not of kind '{expected}'")]
    PayloadMismatch { node: NodeId, expected: &'static str },
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Violations that make the finished graph unsafe to traverse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("Aggregate '{aggregate}' has more than one parent: {}", parents.join(", "))]
    MultipleParents {
        aggregate: String,
        parents: Vec<String>,
    },

    #[error("Composition cycle detected at aggregate '{aggregate}'")]
    CompositionCycle { aggregate: String },

    #[error("Reference cycle prevents data-flow ordering of: {}", remaining.join(", "))]
    ReferenceCycle { remaining: Vec<String> },
}

impl IntegrityError {
    pub fn multiple_parents(aggregate: impl Into<String>, parents: Vec<String>) -> Self {
        Self::MultipleParents {
            aggregate: aggregate.into(),
            parents,
        }
    }

    pub fn composition_cycle(aggregate: impl Into<String>) -> Self {
        Self::CompositionCycle {
            aggregate: aggregate.into(),
        }
    }
}

/// Result type for integrity checks.
pub type IntegrityResult<T> = Result<T, IntegrityError>;
