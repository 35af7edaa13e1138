//! Catalog repository: read side for budgeting, upserts for seeding.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    prelude::DateTimeWithTimeZone,
};
use tracing::debug;

use dovita_core::catalog::{CatalogNode, CatalogQuery, CatalogSource, NodeType, ProjectScope};
use dovita_core::store::StoreError;
use dovita_shared::types::CatalogNodeId;

use crate::entities::catalog_nodes;
use crate::error::{DbError, parse_column};

/// Catalog repository.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
}

impl CatalogRepository {
    /// Creates a new catalog repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists nodes of one type in the requested scopes, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row holds an unknown type or scope.
    pub async fn list(&self, query: &CatalogQuery) -> Result<Vec<CatalogNode>, DbError> {
        let mut select = catalog_nodes::Entity::find()
            .filter(catalog_nodes::Column::NodeType.eq(query.node_type.as_str()));

        if !query.scopes.is_empty() {
            select = select.filter(
                catalog_nodes::Column::ProjectScope
                    .is_in(query.scopes.iter().map(ProjectScope::as_str)),
            );
        }
        if !query.include_inactive {
            select = select.filter(catalog_nodes::Column::Active.eq(true));
        }

        let rows = select
            .order_by_asc(catalog_nodes::Column::Code)
            .all(&self.db)
            .await?;

        debug!(node_type = %query.node_type, rows = rows.len(), "Loaded catalog nodes");
        rows.into_iter().map(node_from_row).collect()
    }

    /// Inserts or updates nodes by ID, parents before children.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails, e.g. on a nesting violation.
    pub async fn upsert_nodes(&self, nodes: &[CatalogNode]) -> Result<u64, DbError> {
        if nodes.is_empty() {
            return Ok(0);
        }

        let mut ordered: Vec<&CatalogNode> = nodes.iter().collect();
        ordered.sort_by_key(|node| node.node_type.depth());

        let now: DateTimeWithTimeZone = Utc::now().into();
        let rows = ordered.into_iter().map(|node| catalog_nodes::ActiveModel {
            id: Set(node.id.into_inner()),
            code: Set(node.code.clone()),
            name: Set(node.name.clone()),
            node_type: Set(node.node_type.as_str().to_string()),
            parent_id: Set(node.parent_id.map(CatalogNodeId::into_inner)),
            project_scope: Set(node.project_scope.as_str().to_string()),
            active: Set(node.active),
            created_at: Set(now),
            updated_at: Set(now),
        });

        let affected = catalog_nodes::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::column(catalog_nodes::Column::Id)
                    .update_columns([
                        catalog_nodes::Column::Code,
                        catalog_nodes::Column::Name,
                        catalog_nodes::Column::NodeType,
                        catalog_nodes::Column::ParentId,
                        catalog_nodes::Column::ProjectScope,
                        catalog_nodes::Column::Active,
                        catalog_nodes::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(affected)
    }
}

#[async_trait]
impl CatalogSource for CatalogRepository {
    async fn list_nodes(&self, query: &CatalogQuery) -> Result<Vec<CatalogNode>, StoreError> {
        Ok(self.list(query).await?)
    }
}

fn node_from_row(row: catalog_nodes::Model) -> Result<CatalogNode, DbError> {
    Ok(CatalogNode {
        id: CatalogNodeId::from_uuid(row.id),
        node_type: parse_column("node_type", &row.node_type, NodeType::parse)?,
        project_scope: parse_column("project_scope", &row.project_scope, ProjectScope::parse)?,
        parent_id: row.parent_id.map(CatalogNodeId::from_uuid),
        code: row.code,
        name: row.name,
        active: row.active,
    })
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
