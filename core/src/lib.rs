//! Aggraph Core Types
//!
//! This crate provides the foundational types shared by every other crate:
//! - Identity types (NodeId, EdgeId)
//! - Tree paths naming aggregates and members by their declaration position
//! - The edge attribute vocabulary that gives graph edges domain meaning
//! - Common error types

mod attrs;
mod error;
mod id;
mod path;

pub use attrs::*;
pub use error::*;
pub use id::*;
pub use path::*;
