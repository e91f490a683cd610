//! Compiler entry point.

use crate::{CompileError, CompilerConfig, Diagnostics, SchemaBuilder};
use aggraph_model::Schema;
use aggraph_parser::{parse_document, Document};

/// Compiles schema declarations into `Schema` handles.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    /// Create a compiler with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile declaration source.
    ///
    /// A syntax error yields exactly one diagnostic; otherwise every problem
    /// found while building is returned together.
    #[tracing::instrument(skip_all, fields(bytes = source.len()))]
    pub fn compile(&self, source: &str) -> Result<Schema, Diagnostics> {
        let document = parse_document(source).map_err(CompileError::from)?;
        self.compile_document(&document)
    }

    /// Compile an already parsed element tree.
    pub fn compile_document(&self, document: &Document) -> Result<Schema, Diagnostics> {
        let result = SchemaBuilder::new(&self.config).build(document);
        match &result {
            Ok(schema) => tracing::info!(
                application = schema.application_name(),
                roots = schema.root_aggregates().len(),
                aggregates = schema.all_aggregates().len(),
                enums = schema.enums().len(),
                "schema compiled"
            ),
            Err(diagnostics) => {
                tracing::info!(diagnostics = diagnostics.len(), "schema rejected")
            }
        }
        result
    }
}

/// Compile declaration source with default settings.
pub fn compile(source: &str) -> Result<Schema, Diagnostics> {
    Compiler::new().compile(source)
}
