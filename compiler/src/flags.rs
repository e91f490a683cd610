//! Tokenizer for the compact flag string of an element.
//!
//! `"key name width:z10"` becomes `[key, name, width=z10]`. Tokens are
//! separated by ASCII spaces or ideographic spaces (U+3000).

use crate::CompileError;
use aggraph_parser::Span;
use std::collections::HashSet;

const FLAG_SEPARATORS: [char; 2] = [' ', '\u{3000}'];

/// One `key` or `key:value` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub key: String,
    pub value: Option<String>,
}

impl Flag {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// Split a flag string into flags.
///
/// Malformed and repeated tokens are reported and dropped; the remaining
/// flags keep their order.
pub fn tokenize_flags(text: &str, element: &str, span: Span) -> (Vec<Flag>, Vec<CompileError>) {
    let mut flags = Vec::new();
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for token in text.split(FLAG_SEPARATORS).filter(|t| !t.trim().is_empty()) {
        let mut parts = token.split(':');
        let key = parts.next().unwrap_or_default();
        let value = parts.next();
        if parts.next().is_some() || key.is_empty() {
            errors.push(CompileError::malformed_flag(element, token, span));
            continue;
        }
        if !seen.insert(key.to_string()) {
            errors.push(CompileError::duplicate_flag(element, key, span));
            continue;
        }
        let flag = match value {
            Some(value) if !value.is_empty() => Flag::with_value(key, value),
            _ => Flag::new(key),
        };
        flags.push(flag);
    }

    (flags, errors)
}
