//! Expectation types and builders for verifying a compile result.

use aggraph_compiler::Diagnostics;
use aggraph_core::TreePath;
use aggraph_model::{AggregateNode, Member, Schema, ValueMember};
use aggraph_relational::{columns, foreign_keys, navigation_properties, Column, Multiplicity};

use crate::error::{ScenarioError, ScenarioResult};

/// Everything one check expects of a compile result.
#[derive(Default)]
pub struct Expectation {
    /// Path of the aggregate the per-aggregate expectations are about.
    pub aggregate: Option<String>,

    // Per-aggregate expectations
    pub members: Option<Vec<String>>,
    pub keys: Option<Vec<String>>,
    pub display: Option<Vec<String>>,
    pub columns: Option<Vec<String>>,
    pub foreign_keys: Vec<(String, Vec<String>)>,
    pub navigations: Vec<(String, Multiplicity)>,

    // Schema-wide expectations
    pub data_flow: Option<Vec<String>>,
    pub data_flow_cycle: bool,

    // Diagnostic expectations
    pub diagnostics: Option<usize>,
    pub error: Option<String>,
    pub error_pattern: Option<String>,

    // Custom assertion function
    #[allow(clippy::type_complexity)]
    pub custom: Option<Box<dyn Fn(&Schema) -> bool + Send + Sync>>,
}

impl std::fmt::Debug for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expectation")
            .field("aggregate", &self.aggregate)
            .field("members", &self.members)
            .field("keys", &self.keys)
            .field("display", &self.display)
            .field("columns", &self.columns)
            .field("foreign_keys", &self.foreign_keys)
            .field("navigations", &self.navigations)
            .field("data_flow", &self.data_flow)
            .field("data_flow_cycle", &self.data_flow_cycle)
            .field("diagnostics", &self.diagnostics)
            .field("error", &self.error)
            .field("error_pattern", &self.error_pattern)
            .field("custom", &self.custom.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Expectation {
    pub fn new() -> Self {
        Self::default()
    }

    fn expects_failure(&self) -> bool {
        self.diagnostics.is_some() || self.error.is_some() || self.error_pattern.is_some()
    }

    /// Verify the expectation against a compile result.
    pub fn verify(&self, check: &str, result: &Result<Schema, Diagnostics>) -> ScenarioResult<()> {
        if self.expects_failure() {
            return self.verify_failure(check, result);
        }

        let schema = match result {
            Ok(schema) => schema,
            Err(diagnostics) => {
                return Err(ScenarioError::assertion_failed(
                    check,
                    format!("expected a schema, got diagnostics:\n{}", diagnostics),
                ))
            }
        };

        self.verify_data_flow(check, schema)?;

        if let Some(ref path) = self.aggregate {
            let aggregate = TreePath::parse(path)
                .and_then(|p| schema.aggregate(&p))
                .ok_or_else(|| ScenarioError::unknown_aggregate(check, path))?;
            self.verify_aggregate(check, &aggregate)?;
        }

        if let Some(ref custom) = self.custom {
            if !custom(schema) {
                return Err(ScenarioError::assertion_failed(check, "custom assertion failed"));
            }
        }

        Ok(())
    }

    fn verify_failure(&self, check: &str, result: &Result<Schema, Diagnostics>) -> ScenarioResult<()> {
        let diagnostics = match result {
            Err(diagnostics) => diagnostics,
            Ok(_) => {
                return Err(ScenarioError::assertion_failed(
                    check,
                    "expected diagnostics, but the schema compiled",
                ))
            }
        };
        let text = diagnostics.to_string();

        if let Some(n) = self.diagnostics {
            if diagnostics.len() != n {
                return Err(ScenarioError::assertion_failed(
                    check,
                    format!("expected {} diagnostics, got {}:\n{}", n, diagnostics.len(), text),
                ));
            }
        }

        if let Some(ref expected) = self.error {
            if !text.contains(expected.as_str()) {
                return Err(ScenarioError::assertion_failed(
                    check,
                    format!("expected a diagnostic containing '{}', got:\n{}", expected, text),
                ));
            }
        }

        if let Some(ref pattern) = self.error_pattern {
            let re = regex_lite::Regex::new(pattern).map_err(|e| {
                ScenarioError::assertion_failed(check, format!("invalid regex pattern: {}", e))
            })?;
            if !diagnostics.messages().iter().any(|m| re.is_match(m)) {
                return Err(ScenarioError::assertion_failed(
                    check,
                    format!("expected a diagnostic matching '{}', got:\n{}", pattern, text),
                ));
            }
        }

        Ok(())
    }

    fn verify_data_flow(&self, check: &str, schema: &Schema) -> ScenarioResult<()> {
        if self.data_flow.is_none() && !self.data_flow_cycle {
            return Ok(());
        }

        let ordered = schema.data_flow_order(&schema.root_aggregates());
        match (ordered, &self.data_flow) {
            (Err(_), _) if self.data_flow_cycle => Ok(()),
            (Ok(order), _) if self.data_flow_cycle => Err(ScenarioError::assertion_failed(
                check,
                format!("expected a reference cycle, got order {:?}", names(&order)),
            )),
            (Ok(order), Some(expected)) => compare(check, "data-flow order", expected, names(&order)),
            (Ok(_), None) => Ok(()),
            (Err(e), _) => Err(ScenarioError::assertion_failed(check, e.to_string())),
        }
    }

    fn verify_aggregate(&self, check: &str, aggregate: &AggregateNode<'_>) -> ScenarioResult<()> {
        if let Some(ref expected) = self.members {
            let actual = aggregate.members().iter().map(Member::name).collect();
            compare(check, "members", expected, actual)?;
        }

        if let Some(ref expected) = self.keys {
            let actual = value_names(&aggregate.key_values());
            compare(check, "keys", expected, actual)?;
        }

        if let Some(ref expected) = self.display {
            let actual = value_names(&aggregate.display_members());
            compare(check, "display members", expected, actual)?;
        }

        if let Some(ref expected) = self.columns {
            let actual = columns(aggregate).iter().map(Column::name).collect();
            compare(check, "columns", expected, actual)?;
        }

        let keys = foreign_keys(aggregate);
        for (principal, expected) in &self.foreign_keys {
            let key = keys
                .iter()
                .find(|k| k.principal().name() == principal.as_str())
                .ok_or_else(|| {
                    ScenarioError::assertion_failed(
                        check,
                        format!("no foreign key to '{}' on '{}'", principal, aggregate.path()),
                    )
                })?;
            compare(check, "foreign key", expected, key.column_names())?;
        }

        let navigations = navigation_properties(aggregate);
        for (property, multiplicity) in &self.navigations {
            let end = navigations
                .iter()
                .filter_map(|n| n.end_of(aggregate))
                .find(|e| e.property_name() == property.as_str())
                .ok_or_else(|| {
                    ScenarioError::assertion_failed(
                        check,
                        format!("no navigation '{}' on '{}'", property, aggregate.path()),
                    )
                })?;
            if end.multiplicity() != *multiplicity {
                return Err(ScenarioError::assertion_failed(
                    check,
                    format!(
                        "navigation '{}' reaches {}, expected {}",
                        property,
                        end.multiplicity(),
                        multiplicity
                    ),
                ));
            }
        }

        Ok(())
    }
}

/// Builder for fluent expectation construction.
pub struct ExpectationBuilder {
    expectation: Expectation,
}

impl ExpectationBuilder {
    pub fn new() -> Self {
        Self {
            expectation: Expectation::new(),
        }
    }

    pub fn build(self) -> Expectation {
        self.expectation
    }

    // ========== Aggregate expectations ==========

    /// Aggregate, by declaration path, that the following expectations are about.
    pub fn aggregate(mut self, path: impl Into<String>) -> Self {
        self.expectation.aggregate = Some(path.into());
        self
    }

    /// Assert the ordered member names.
    pub fn members(mut self, names: &[&str]) -> Self {
        self.expectation.members = Some(owned(names));
        self
    }

    /// Assert the ordered key column names.
    pub fn keys(mut self, names: &[&str]) -> Self {
        self.expectation.keys = Some(owned(names));
        self
    }

    /// Assert the ordered display member names.
    pub fn display(mut self, names: &[&str]) -> Self {
        self.expectation.display = Some(owned(names));
        self
    }

    pub fn columns(mut self, names: &[&str]) -> Self {
        self.expectation.columns = Some(owned(names));
        self
    }

    /// Assert a foreign key to `principal` over exactly these columns.
    pub fn foreign_key(mut self, principal: &str, columns: &[&str]) -> Self {
        self.expectation
            .foreign_keys
            .push((principal.to_string(), owned(columns)));
        self
    }

    /// Assert a navigation property of the aggregate and how many it reaches.
    pub fn navigates(mut self, property: &str, multiplicity: Multiplicity) -> Self {
        self.expectation
            .navigations
            .push((property.to_string(), multiplicity));
        self
    }

    // ========== Schema expectations ==========

    /// Assert the data-flow order of all roots.
    pub fn data_flow(mut self, names: &[&str]) -> Self {
        self.expectation.data_flow = Some(owned(names));
        self
    }

    /// Assert that ordering the roots fails on a reference cycle.
    pub fn data_flow_cycle(mut self) -> Self {
        self.expectation.data_flow_cycle = true;
        self
    }

    // ========== Diagnostic expectations ==========

    /// Assert that compiling fails with exactly N diagnostics.
    pub fn diagnostics(mut self, n: usize) -> Self {
        self.expectation.diagnostics = Some(n);
        self
    }

    /// Assert that compiling fails with a diagnostic containing the text.
    pub fn error(mut self, contains: impl Into<String>) -> Self {
        self.expectation.error = Some(contains.into());
        self
    }

    /// Assert that compiling fails with a diagnostic matching the regex.
    pub fn error_matches(mut self, pattern: impl Into<String>) -> Self {
        self.expectation.error_pattern = Some(pattern.into());
        self
    }

    // ========== Advanced ==========

    /// Custom assertion function.
    pub fn assert_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Schema) -> bool + Send + Sync + 'static,
    {
        self.expectation.custom = Some(Box::new(f));
        self
    }
}

impl Default for ExpectationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn names(aggregates: &[AggregateNode<'_>]) -> Vec<String> {
    aggregates.iter().map(|a| a.name().to_string()).collect()
}

fn value_names(members: &[ValueMember<'_>]) -> Vec<String> {
    members.iter().map(ValueMember::member_name).collect()
}

fn compare(check: &str, what: &str, expected: &[String], actual: Vec<String>) -> ScenarioResult<()> {
    if expected == actual.as_slice() {
        Ok(())
    } else {
        Err(ScenarioError::assertion_failed(
            check,
            format!("expected {} {:?}, got {:?}", what, expected, actual),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aggraph_compiler::compile;

    const SOURCE: &str = r#"
        Shop {
            Order {
                Id is="word key"
            }
        }
    "#;

    #[test]
    fn test_members_mismatch_is_reported() {
        let result = compile(SOURCE);
        let expectation = ExpectationBuilder::new()
            .aggregate("Order")
            .members(&["Code"])
            .build();

        let err = expectation.verify("members", &result).unwrap_err();

        assert!(err.to_string().contains("expected members [\"Code\"], got [\"Id\"]"));
    }

    #[test]
    fn test_error_expected_but_compiled() {
        let result = compile(SOURCE);
        let expectation = ExpectationBuilder::new().error("conflict").build();

        assert!(expectation.verify("error", &result).is_err());
    }

    #[test]
    fn test_unknown_aggregate() {
        let result = compile(SOURCE);
        let expectation = ExpectationBuilder::new().aggregate("Invoice").build();

        let err = expectation.verify("missing", &result).unwrap_err();

        assert!(matches!(err, ScenarioError::UnknownAggregate { .. }));
    }
}
