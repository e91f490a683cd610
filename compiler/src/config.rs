//! Compiler settings supplied by the caller.

use crate::{CompileError, CompileResult};
use aggraph_registry::ValueType;
use serde::Deserialize;

/// Settings for one compiler.
///
/// ```toml
/// application_name = "Shop"
/// report_unknown_attributes = true
///
/// [[custom_types]]
/// name = "money"
/// primitive = "decimal"
/// search = "range"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Used instead of the declaration's root element name.
    pub application_name: Option<String>,
    /// Report attributes the builder does not understand.
    pub report_unknown_attributes: bool,
    /// Member types available besides the built-ins.
    pub custom_types: Vec<ValueType>,
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(text: &str) -> CompileResult<Self> {
        toml::from_str(text).map_err(|e| CompileError::Config(e.to_string()))
    }

    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    pub fn report_unknown_attributes(mut self, report: bool) -> Self {
        self.report_unknown_attributes = report;
        self
    }

    pub fn with_custom_type(mut self, ty: ValueType) -> Self {
        self.custom_types.push(ty);
        self
    }
}
