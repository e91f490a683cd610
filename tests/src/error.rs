//! Error types for the scenario framework.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for scenario operations.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Errors that can occur when running scenarios.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Failed to read a file.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Neither a fixture nor inline source was given.
    #[error("no declaration specified for scenario '{scenario}'")]
    MissingSource { scenario: String },

    /// A check names an aggregate the schema does not have.
    #[error("check '{check}': no aggregate at '{path}'")]
    UnknownAggregate { check: String, path: String },

    /// Assertion failed.
    #[error("assertion failed for check '{check}': {message}")]
    AssertionFailed { check: String, message: String },
}

impl ScenarioError {
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    pub fn missing_source(scenario: impl Into<String>) -> Self {
        Self::MissingSource {
            scenario: scenario.into(),
        }
    }

    pub fn unknown_aggregate(check: impl Into<String>, path: impl Into<String>) -> Self {
        Self::UnknownAggregate {
            check: check.into(),
            path: path.into(),
        }
    }

    pub fn assertion_failed(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            check: check.into(),
            message: message.into(),
        }
    }
}
