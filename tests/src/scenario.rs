//! Scenario definition and builder.

use std::path::PathBuf;

use aggraph_compiler::{Compiler, CompilerConfig, Diagnostics};
use aggraph_model::Schema;

use crate::assertion::{Expectation, ExpectationBuilder};
use crate::error::{ScenarioError, ScenarioResult};
use crate::loader::Fixture;

/// A named check with its expectation.
#[derive(Debug)]
pub struct Check {
    pub name: String,
    pub expectation: Expectation,
}

/// A declaration plus the checks its compile result must pass.
pub struct Scenario {
    /// Scenario name (for reporting).
    name: String,
    /// Fixture path, relative to `fixtures/`.
    fixture_path: Option<PathBuf>,
    /// Inline declaration, used instead of a fixture.
    source: Option<String>,
    config: CompilerConfig,
    checks: Vec<Check>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixture_path: None,
            source: None,
            config: CompilerConfig::default(),
            checks: Vec::new(),
        }
    }

    /// Set the fixture file (relative to fixtures/).
    pub fn fixture(mut self, path: impl Into<PathBuf>) -> Self {
        self.fixture_path = Some(path.into());
        self
    }

    /// Use an inline declaration.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a check with an expectation.
    pub fn check<F>(mut self, name: impl Into<String>, expectation_fn: F) -> Self
    where
        F: FnOnce(ExpectationBuilder) -> ExpectationBuilder,
    {
        let expectation = expectation_fn(ExpectationBuilder::new()).build();
        self.checks.push(Check {
            name: name.into(),
            expectation,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// The declaration text: inline source first, else the fixture.
    pub fn load_source(&self) -> ScenarioResult<String> {
        if let Some(ref source) = self.source {
            return Ok(source.clone());
        }
        match &self.fixture_path {
            Some(path) => Fixture::load(path).map(|f| f.source),
            None => Err(ScenarioError::missing_source(&self.name)),
        }
    }

    /// Compile the declaration without checking anything.
    pub fn compile(&self) -> ScenarioResult<Result<Schema, Diagnostics>> {
        let source = self.load_source()?;
        Ok(Compiler::with_config(self.config.clone()).compile(&source))
    }

    /// Compile, then verify every check in order.
    pub fn run(&self) -> ScenarioResult<()> {
        crate::init_tracing();
        let result = self.compile()?;
        for check in &self.checks {
            check.expectation.verify(&check.name, &result)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_builder() {
        let scenario = Scenario::new("test")
            .fixture("orders.schema")
            .check("members", |e| e.aggregate("Order").members(&["Id"]))
            .check("keys", |e| e.aggregate("Order").keys(&["Id"]));

        assert_eq!(scenario.name(), "test");
        assert_eq!(scenario.checks().len(), 2);
    }

    #[test]
    fn test_missing_source() {
        let scenario = Scenario::new("empty");

        assert!(matches!(
            scenario.run(),
            Err(ScenarioError::MissingSource { .. })
        ));
    }

    #[test]
    fn test_inline_source_wins() {
        let scenario = Scenario::new("inline")
            .fixture("missing.schema")
            .source("App { Tag { Label is=\"word key\" } }")
            .check("keys", |e| e.aggregate("Tag").keys(&["Label"]));

        scenario.run().unwrap();
    }
}
