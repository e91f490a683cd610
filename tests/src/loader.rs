//! Loader for schema fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ScenarioError, ScenarioResult};

/// A declaration read from disk.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub path: PathBuf,
    pub source: String,
}

impl Fixture {
    /// Load a fixture; relative paths resolve against `fixtures/`.
    pub fn load(path: impl AsRef<Path>) -> ScenarioResult<Self> {
        let path = resolve(path.as_ref());
        let source = fs::read_to_string(&path).map_err(|e| ScenarioError::file_read(&path, e))?;
        Ok(Self { path, source })
    }
}

fn resolve(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        fixtures_root().join(path)
    }
}

/// The `fixtures/` directory of this crate.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_fixture() {
        let fixture = Fixture::load("orders.schema").unwrap();

        assert!(fixture.path.ends_with("fixtures/orders.schema"));
        assert!(fixture.source.contains("Order"));
    }

    #[test]
    fn test_load_missing_fixture() {
        let result = Fixture::load("missing.schema");

        assert!(matches!(result, Err(ScenarioError::FileRead { .. })));
    }
}
