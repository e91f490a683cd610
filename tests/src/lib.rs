//! Aggraph Integration Test Framework
//!
//! Provides a fluent API for checking what a schema declaration compiles to.
//!
//! # Structure
//!
//! - **fixtures/*.schema** - Declarations shared by several scenarios
//! - **scenarios** - Test orchestration (Rust: fixture + checks)
//!
//! # Example
//!
//! ```ignore
//! use aggraph_tests::prelude::*;
//!
//! pub fn scenario() -> Scenario {
//!     Scenario::new("orders")
//!         .fixture("orders.schema")
//!         .check("line_keys", |e| e.aggregate("Order/Lines").keys(&["Order_Id", "LineNo"]))
//!         .check("line_parent", |e| e.aggregate("Order/Lines").navigates("Parent", Multiplicity::One))
//! }
//!
//! #[test]
//! fn test() {
//!     scenario().run().unwrap();
//! }
//! ```

mod assertion;
mod error;
mod loader;
mod scenario;

pub use assertion::{Expectation, ExpectationBuilder};
pub use error::{ScenarioError, ScenarioResult};
pub use loader::{fixtures_root, Fixture};
pub use scenario::Scenario;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::assertion::{Expectation, ExpectationBuilder};
    pub use crate::error::{ScenarioError, ScenarioResult};
    pub use crate::loader::Fixture;
    pub use crate::scenario::Scenario;
    pub use aggraph_compiler::CompilerConfig;
    pub use aggraph_relational::Multiplicity;
}

/// Install a test-friendly subscriber once; filtered by `RUST_LOG`, `warn` by default.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    // Another test may have installed it already.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
