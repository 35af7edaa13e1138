//! Construction catalog hierarchy (department → mayor → partida → subpartida).
//!
//! The catalog is maintained elsewhere; budgeting only reads it.

pub mod cache;
pub mod error;
pub mod source;
pub mod tree;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::CachedCatalog;
pub use error::CatalogError;
pub use source::{CatalogSource, StaticCatalog};
pub use tree::CatalogTree;
pub use types::{CatalogNode, CatalogQuery, NodeType, ProjectScope};
