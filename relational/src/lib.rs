//! Aggraph Relational Facts
//!
//! Pure functions over a finished schema that downstream renderers use to
//! emit storage and view code:
//! - Column identity of value members
//! - Foreign keys along composition and reference edges
//! - Navigation properties with multiplicity and delete behavior
//! - Search fields reachable from a root aggregate
//!
//! Nothing here is stored back into the graph; every call recomputes.

mod column;
mod foreign_key;
mod navigation;
mod path;
mod search;

pub use column::{columns, Column};
pub use foreign_key::{foreign_keys, ForeignKey, ForeignKeyColumn};
pub use navigation::{
    navigation_properties, DeleteBehavior, Multiplicity, NavigationEnd, NavigationKind,
    NavigationProperty, PARENT_PROPERTY_NAME,
};
pub use path::full_path;
pub use search::{search_fields, SearchField};
