//! Catalog read port.

use async_trait::async_trait;

use super::types::{CatalogNode, CatalogQuery};
use crate::store::StoreError;

/// Read access to the catalog maintained by the catalog-management feature.
///
/// Implementations return the nodes matching `query` ordered by code.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Lists the nodes matching `query`, ordered by code.
    async fn list_nodes(&self, query: &CatalogQuery) -> Result<Vec<CatalogNode>, StoreError>;
}

/// Serves catalog reads from a fixed list of nodes.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    nodes: Vec<CatalogNode>,
}

impl StaticCatalog {
    /// Creates a source over `nodes`.
    #[must_use]
    pub fn new(nodes: Vec<CatalogNode>) -> Self {
        Self { nodes }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn list_nodes(&self, query: &CatalogQuery) -> Result<Vec<CatalogNode>, StoreError> {
        let mut nodes: Vec<CatalogNode> = self
            .nodes
            .iter()
            .filter(|node| query.matches(node))
            .cloned()
            .collect();
        nodes.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(nodes)
    }
}
