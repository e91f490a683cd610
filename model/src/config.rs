//! Settings declared inside the schema itself.

use serde::Serialize;
use std::collections::BTreeMap;

/// Contents of the schema's configuration section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaConfig {
    /// Namespace generated code is placed in.
    pub root_namespace: Option<String>,
    /// Any other setting, verbatim.
    pub extra: BTreeMap<String, String>,
}

impl SchemaConfig {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }
}
