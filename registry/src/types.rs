//! Member type behaviors.

use crate::EnumDefinition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How a search condition compares against a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchBehavior {
    /// Exact match.
    Strict,
    /// Substring match.
    PartialMatch,
    /// Prefix match.
    ForwardMatch,
    /// Suffix match.
    BackwardMatch,
    /// From/to range.
    Range,
}

/// Shape of the value a member holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveKind {
    String,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    YearMonth,
    Uuid,
    Enum,
}

/// Behavior of a leaf value type.
pub trait MemberType: fmt::Debug + Send + Sync {
    /// Name used in declarations.
    fn name(&self) -> &str;

    fn primitive_kind(&self) -> PrimitiveKind;

    fn search_behavior(&self) -> SearchBehavior;

    /// Edited as multi-line text.
    fn multi_line(&self) -> bool {
        false
    }

    /// Value set, for enumeration types.
    fn enum_definition(&self) -> Option<&EnumDefinition> {
        None
    }
}

/// A plain value type: the built-ins and types declared in compiler config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueType {
    pub name: String,
    pub primitive: PrimitiveKind,
    pub search: SearchBehavior,
    #[serde(default)]
    pub multi_line: bool,
}

impl ValueType {
    pub fn new(name: impl Into<String>, primitive: PrimitiveKind, search: SearchBehavior) -> Self {
        Self {
            name: name.into(),
            primitive,
            search,
            multi_line: false,
        }
    }

    pub fn multi_line(mut self) -> Self {
        self.multi_line = true;
        self
    }
}

impl MemberType for ValueType {
    fn name(&self) -> &str {
        &self.name
    }

    fn primitive_kind(&self) -> PrimitiveKind {
        self.primitive
    }

    fn search_behavior(&self) -> SearchBehavior {
        self.search
    }

    fn multi_line(&self) -> bool {
        self.multi_line
    }
}

/// Names of the built-in types.
pub mod builtin {
    pub const WORD: &str = "word";
    pub const SENTENCE: &str = "sentence";
    pub const INT: &str = "int";
    pub const DECIMAL: &str = "decimal";
    pub const BOOL: &str = "bool";
    pub const DATE: &str = "date";
    pub const DATETIME: &str = "datetime";
    pub const YEAR_MONTH: &str = "yearmonth";
    pub const UUID: &str = "uuid";
}

/// The value types every registry starts with.
pub fn builtin_types() -> Vec<ValueType> {
    use PrimitiveKind as P;
    use SearchBehavior as S;
    vec![
        ValueType::new(builtin::WORD, P::String, S::PartialMatch),
        ValueType::new(builtin::SENTENCE, P::String, S::PartialMatch).multi_line(),
        ValueType::new(builtin::INT, P::Integer, S::Range),
        ValueType::new(builtin::DECIMAL, P::Decimal, S::Range),
        ValueType::new(builtin::BOOL, P::Boolean, S::Strict),
        ValueType::new(builtin::DATE, P::Date, S::Range),
        ValueType::new(builtin::DATETIME, P::DateTime, S::Range),
        ValueType::new(builtin::YEAR_MONTH, P::YearMonth, S::Range),
        ValueType::new(builtin::UUID, P::Uuid, S::Strict),
    ]
}

/// An enumeration used as a member type.
#[derive(Debug, Clone)]
pub struct EnumType {
    definition: Arc<EnumDefinition>,
}

impl EnumType {
    pub fn new(definition: Arc<EnumDefinition>) -> Self {
        Self { definition }
    }

    pub fn definition(&self) -> &Arc<EnumDefinition> {
        &self.definition
    }
}

impl MemberType for EnumType {
    fn name(&self) -> &str {
        &self.definition.name
    }

    fn primitive_kind(&self) -> PrimitiveKind {
        PrimitiveKind::Enum
    }

    fn search_behavior(&self) -> SearchBehavior {
        SearchBehavior::Strict
    }

    fn enum_definition(&self) -> Option<&EnumDefinition> {
        Some(&self.definition)
    }
}
