//! Compiler error types.

use aggraph_parser::Span;
use std::fmt;
use thiserror::Error;

/// A problem found while compiling a declaration.
///
/// Everything except `Integrity` is recoverable: the builder records it and
/// keeps going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// Syntax error in the element tree.
    #[error("{0}")]
    Parse(#[from] aggraph_parser::ParseError),

    #[error("Flag '{token}' on '{element}' contains more than one ':' at line {line}, column {column}")]
    MalformedFlag {
        element: String,
        token: String,
        line: usize,
        column: usize,
    },

    #[error("Flag '{key}' is given more than once on '{element}' at line {line}, column {column}")]
    DuplicateFlag {
        element: String,
        key: String,
        line: usize,
        column: usize,
    },

    #[error("Flag '{flag}' on '{element}' needs a value at line {line}, column {column}")]
    MissingFlagValue {
        element: String,
        flag: String,
        line: usize,
        column: usize,
    },

    #[error("Invalid value '{value}' for flag '{flag}' on '{element}' at line {line}, column {column}")]
    InvalidFlagValue {
        element: String,
        flag: String,
        value: String,
        line: usize,
        column: usize,
    },

    #[error("Flag '{flag}' does not apply to '{element}' at line {line}, column {column}")]
    FlagNotApplicable {
        element: String,
        flag: String,
        line: usize,
        column: usize,
    },

    #[error("Conflicting values for {property} on '{element}': {values} at line {line}, column {column}")]
    ConflictingFlags {
        element: String,
        property: String,
        values: String,
        line: usize,
        column: usize,
    },

    #[error("Unknown flags on '{element}': {tokens} at line {line}, column {column}")]
    UnknownFlags {
        element: String,
        tokens: String,
        line: usize,
        column: usize,
    },

    #[error("Unknown attribute '{attribute}' on '{element}' at line {line}, column {column}")]
    UnknownAttribute {
        element: String,
        attribute: String,
        line: usize,
        column: usize,
    },

    #[error("'{element}' cannot be declared {placement} at line {line}, column {column}")]
    MisplacedElement {
        element: String,
        placement: &'static str,
        line: usize,
        column: usize,
    },

    #[error("Duplicate declaration of '{path}' at line {line}, column {column}")]
    DuplicatePath {
        path: String,
        line: usize,
        column: usize,
    },

    #[error("Member '{element}' has no type at line {line}, column {column}")]
    MissingMemberType {
        element: String,
        line: usize,
        column: usize,
    },

    #[error("Unknown member type '{name}' on '{element}' at line {line}, column {column}")]
    UnknownMemberType {
        element: String,
        name: String,
        line: usize,
        column: usize,
    },

    #[error("Scalar member '{element}' cannot have children at line {line}, column {column}")]
    ScalarWithChildren {
        element: String,
        line: usize,
        column: usize,
    },

    #[error("Reference '{element}' points at unknown aggregate '{target}' at line {line}, column {column}")]
    UnknownRefTarget {
        element: String,
        target: String,
        line: usize,
        column: usize,
    },

    #[error("'{element}' depends on '{target}', which is not a root aggregate, at line {line}, column {column}")]
    UnknownDependency {
        element: String,
        target: String,
        line: usize,
        column: usize,
    },

    #[error("Variation group '{group}' has no items at line {line}, column {column}")]
    EmptyVariationGroup {
        group: String,
        line: usize,
        column: usize,
    },

    #[error("'{element}' inside variation group '{group}' is not a variation item at line {line}, column {column}")]
    NotAVariationItem {
        element: String,
        group: String,
        line: usize,
        column: usize,
    },

    #[error("Variation group '{group}' uses tag '{key}' more than once at line {line}, column {column}")]
    DuplicateVariationKey {
        group: String,
        key: String,
        line: usize,
        column: usize,
    },

    #[error("Value '{value}' of enum item '{enumeration}.{item}' is not an integer at line {line}, column {column}")]
    InvalidEnumValue {
        enumeration: String,
        item: String,
        value: String,
        line: usize,
        column: usize,
    },

    #[error("Invalid configuration value '{value}' for '{key}' at line {line}, column {column}")]
    InvalidConfig {
        key: String,
        value: String,
        line: usize,
        column: usize,
    },

    #[error("Invalid compiler configuration: {0}")]
    Config(String),

    #[error("Registry error: {0}")]
    Registry(#[from] aggraph_registry::RegistryError),

    #[error("Graph error: {0}")]
    Graph(#[from] aggraph_core::GraphError),

    /// The graph cannot be traversed safely. Fatal.
    #[error("{0}")]
    Integrity(#[from] aggraph_core::IntegrityError),
}

impl CompileError {
    pub fn malformed_flag(element: &str, token: &str, span: Span) -> Self {
        Self::MalformedFlag {
            element: element.to_string(),
            token: token.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn duplicate_flag(element: &str, key: &str, span: Span) -> Self {
        Self::DuplicateFlag {
            element: element.to_string(),
            key: key.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn missing_flag_value(element: &str, flag: &str, span: Span) -> Self {
        Self::MissingFlagValue {
            element: element.to_string(),
            flag: flag.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn invalid_flag_value(element: &str, flag: &str, value: &str, span: Span) -> Self {
        Self::InvalidFlagValue {
            element: element.to_string(),
            flag: flag.to_string(),
            value: value.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn flag_not_applicable(element: &str, flag: &str, span: Span) -> Self {
        Self::FlagNotApplicable {
            element: element.to_string(),
            flag: flag.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn conflicting_flags(element: &str, property: &str, values: String, span: Span) -> Self {
        Self::ConflictingFlags {
            element: element.to_string(),
            property: property.to_string(),
            values,
            line: span.line,
            column: span.column,
        }
    }

    pub fn unknown_flags(element: &str, tokens: &[String], span: Span) -> Self {
        Self::UnknownFlags {
            element: element.to_string(),
            tokens: tokens.join(" "),
            line: span.line,
            column: span.column,
        }
    }

    pub fn unknown_attribute(element: &str, attribute: &str, span: Span) -> Self {
        Self::UnknownAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn misplaced(element: &str, placement: &'static str, span: Span) -> Self {
        Self::MisplacedElement {
            element: element.to_string(),
            placement,
            line: span.line,
            column: span.column,
        }
    }

    pub fn duplicate_path(path: impl ToString, span: Span) -> Self {
        Self::DuplicatePath {
            path: path.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn missing_member_type(element: &str, span: Span) -> Self {
        Self::MissingMemberType {
            element: element.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn unknown_member_type(element: &str, name: &str, span: Span) -> Self {
        Self::UnknownMemberType {
            element: element.to_string(),
            name: name.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn scalar_with_children(element: &str, span: Span) -> Self {
        Self::ScalarWithChildren {
            element: element.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn unknown_ref_target(element: &str, target: &str, span: Span) -> Self {
        Self::UnknownRefTarget {
            element: element.to_string(),
            target: target.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn unknown_dependency(element: &str, target: &str, span: Span) -> Self {
        Self::UnknownDependency {
            element: element.to_string(),
            target: target.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn empty_variation_group(group: &str, span: Span) -> Self {
        Self::EmptyVariationGroup {
            group: group.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn not_a_variation_item(element: &str, group: &str, span: Span) -> Self {
        Self::NotAVariationItem {
            element: element.to_string(),
            group: group.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn duplicate_variation_key(group: &str, key: &str, span: Span) -> Self {
        Self::DuplicateVariationKey {
            group: group.to_string(),
            key: key.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn invalid_enum_value(enumeration: &str, item: &str, value: &str, span: Span) -> Self {
        Self::InvalidEnumValue {
            enumeration: enumeration.to_string(),
            item: item.to_string(),
            value: value.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn invalid_config(key: &str, value: &str, span: Span) -> Self {
        Self::InvalidConfig {
            key: key.to_string(),
            value: value.to_string(),
            line: span.line,
            column: span.column,
        }
    }

    /// True for errors that make the graph unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CompileError::Integrity(_))
    }
}

/// Result type for compiler operations that fail with one error.
pub type CompileResult<T> = Result<T, CompileError>;

/// Every problem found in one compile, in the order found.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Diagnostics(Vec<CompileError>);

impl Diagnostics {
    pub fn new(errors: Vec<CompileError>) -> Self {
        Self(errors)
    }

    pub fn errors(&self) -> &[CompileError] {
        &self.0
    }

    pub fn into_errors(self) -> Vec<CompileError> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompileError> {
        self.0.iter()
    }

    /// Human readable messages, one per problem.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl From<CompileError> for Diagnostics {
    fn from(error: CompileError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}
