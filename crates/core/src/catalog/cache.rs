//! Catalog read caching using Moka.
//!
//! The catalog does not change while a budget is being built, so repeated
//! reads of the same level and scopes are served from memory.

use async_trait::async_trait;
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use dovita_shared::config::CatalogConfig;

use super::source::CatalogSource;
use super::types::{CatalogNode, CatalogQuery};
use crate::store::StoreError;

/// Caching decorator over any [`CatalogSource`].
#[derive(Clone)]
pub struct CachedCatalog<S> {
    source: S,
    cache: Cache<CatalogQuery, Arc<Vec<CatalogNode>>>,
}

impl<S: CatalogSource> CachedCatalog<S> {
    /// Wraps `source` with the configured capacity and TTL.
    #[must_use]
    pub fn new(source: S, config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();

        Self { source, cache }
    }

    /// Drops every cached read, e.g. after the catalog was edited.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Returns the number of cached entries.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

#[async_trait]
impl<S: CatalogSource> CatalogSource for CachedCatalog<S> {
    async fn list_nodes(&self, query: &CatalogQuery) -> Result<Vec<CatalogNode>, StoreError> {
        if let Some(cached) = self.cache.get(query) {
            debug!(node_type = %query.node_type, "Catalog cache hit");
            return Ok((*cached).clone());
        }

        let nodes = self.source.list_nodes(query).await?;
        self.cache.insert(query.clone(), Arc::new(nodes.clone()));
        Ok(nodes)
    }
}
