//! Aggraph Compiler
//!
//! Turn a schema declaration into a populated `Schema`.
//!
//! Responsibilities:
//! - Read the element tree
//! - Tokenize each element's flag string
//! - Resolve flags into facts with Force / IfNotSpecified priority
//! - Classify elements and populate the aggregate graph
//! - Collect every recoverable problem as a diagnostic

mod builder;
mod candidate;
mod compiler;
mod config;
mod element;
mod error;
mod flags;

pub use builder::SchemaBuilder;
pub use candidate::{resolve_candidates, Candidate, Conflict, Priority, Resolved};
pub use compiler::{compile, Compiler};
pub use config::CompilerConfig;
pub use element::{resolve_element, ElementFacts, ElementKind, FactValue, Property};
pub use error::{CompileError, CompileResult, Diagnostics};
pub use flags::{tokenize_flags, Flag};
