//! Aggraph Parser
//!
//! Reader for the brace-nested element tree that schema declarations are
//! written in:
//! - Lexing names, quoted strings and punctuation, skipping comments
//! - Parsing elements with `name="value"` attributes and nested children
//! - Error handling with location information
//!
//! The reader attaches no meaning to element or attribute names.

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::*;
pub use error::*;
pub use parser::{parse_document, Parser};
