//! Budget repository: budget rows with their ordered items.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, prelude::DateTimeWithTimeZone,
};
use tracing::info;
use uuid::Uuid;

use dovita_core::budget::{Budget, BudgetStatus, BudgetType, LineItem};
use dovita_core::store::{BudgetStore, StoreError};
use dovita_shared::types::{BudgetId, CatalogNodeId, LineItemId, ProjectId};

use crate::entities::{budget_items, budgets};
use crate::error::{DbError, parse_column};

/// Budget repository.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads a budget with its items ordered by `order_index`.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` for an unknown ID, or a mapping or query error.
    pub async fn find(&self, id: BudgetId) -> Result<Budget, DbError> {
        let row = budgets::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(DbError::NotFound {
                entity: "budget",
                id: id.into_inner(),
            })?;

        let items = budget_items::Entity::find()
            .filter(budget_items::Column::BudgetId.eq(row.id))
            .order_by_asc(budget_items::Column::OrderIndex)
            .all(&self.db)
            .await?;

        budget_from_rows(row, items)
    }

    /// Lists the budgets of a project, newest first, without their items.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be mapped.
    pub async fn list_for_project(&self, project_id: ProjectId) -> Result<Vec<Budget>, DbError> {
        let rows = budgets::Entity::find()
            .filter(budgets::Column::ProjectId.eq(project_id.into_inner()))
            .order_by_desc(budgets::Column::CreatedAt)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|row| budget_from_rows(row, Vec::new()))
            .collect()
    }

    /// Upserts the budget row and replaces all of its items.
    ///
    /// The row write, the item delete and the item insert share one
    /// transaction; any failure rolls all three back.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` when updating a budget that does not exist,
    /// or the database error that aborted the transaction.
    pub async fn save(&self, budget: &Budget) -> Result<Budget, DbError> {
        let txn = self.db.begin().await?;
        let now = Utc::now();

        let (id, created_at) = match budget.id {
            Some(id) => {
                let existing = budgets::Entity::find_by_id(id.into_inner())
                    .one(&txn)
                    .await?
                    .ok_or(DbError::NotFound {
                        entity: "budget",
                        id: id.into_inner(),
                    })?;
                let created_at = existing.created_at.with_timezone(&Utc);
                budgets::Entity::update_many()
                    .set(budget_row(budget, id, created_at, now))
                    .filter(budgets::Column::Id.eq(id.into_inner()))
                    .exec(&txn)
                    .await?;
                (id, created_at)
            }
            None => {
                let id = BudgetId::new();
                budgets::Entity::insert(budget_row(budget, id, now, now))
                    .exec_without_returning(&txn)
                    .await?;
                (id, now)
            }
        };

        let mut stored = budget.clone();
        stored.id = Some(id);
        stored.created_at = Some(created_at);
        stored.updated_at = Some(now);
        for (index, item) in stored.items.iter_mut().enumerate() {
            item.id = Some(LineItemId::new());
            item.order_index = i32::try_from(index).unwrap_or(i32::MAX);
        }

        replace_items(&txn, id, &stored.items, now).await?;
        txn.commit().await?;

        info!(
            budget_id = %id,
            status = %stored.status,
            items = stored.items.len(),
            "Budget persisted"
        );
        Ok(stored)
    }
}

#[async_trait]
impl BudgetStore for BudgetRepository {
    async fn load_budget(&self, id: BudgetId) -> Result<Budget, StoreError> {
        Ok(self.find(id).await?)
    }

    async fn save_budget(&self, budget: &Budget) -> Result<Budget, StoreError> {
        Ok(self.save(budget).await?)
    }
}

/// Deletes every item of `budget_id` and inserts `items` in their place.
async fn replace_items<C: ConnectionTrait>(
    conn: &C,
    budget_id: BudgetId,
    items: &[LineItem],
    now: DateTime<Utc>,
) -> Result<(), DbError> {
    budget_items::Entity::delete_many()
        .filter(budget_items::Column::BudgetId.eq(budget_id.into_inner()))
        .exec(conn)
        .await?;

    if items.is_empty() {
        return Ok(());
    }

    let created_at: DateTimeWithTimeZone = now.into();
    let rows = items.iter().map(|item| budget_items::ActiveModel {
        id: Set(item.id.unwrap_or_default().into_inner()),
        budget_id: Set(budget_id.into_inner()),
        mayor_id: Set(item.mayor_id.into_inner()),
        partida_id: Set(item.partida_id.map(CatalogNodeId::into_inner)),
        subpartida_id: Set(item.subpartida_id.map(CatalogNodeId::into_inner)),
        description: Set(item.description.clone()),
        unit: Set(item.unit.clone()),
        quantity_real: Set(item.quantity_real),
        waste_pct: Set(item.waste_pct),
        unit_cost: Set(item.unit_cost),
        fee_pct: Set(item.fee_pct),
        supplier_alias: Set(item.supplier_alias.clone()),
        order_index: Set(item.order_index),
        created_at: Set(created_at),
    });

    budget_items::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

fn budget_row(
    budget: &Budget,
    id: BudgetId,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> budgets::ActiveModel {
    budgets::ActiveModel {
        id: Set(id.into_inner()),
        project_id: Set(budget.project_id.into_inner()),
        budget_type: Set(budget.budget_type.as_str().to_string()),
        tax_enabled: Set(budget.tax_enabled),
        client_view_enabled: Set(budget.client_view_enabled),
        shared_with_construction: Set(budget.shared_with_construction),
        status: Set(budget.status.as_str().to_string()),
        notes: Set(budget.notes.clone()),
        version: Set(budget.version),
        selected_nodes: Set(budget
            .selected_nodes
            .iter()
            .copied()
            .map(CatalogNodeId::into_inner)
            .collect()),
        published_at: Set(budget.published_at.map(Into::into)),
        created_at: Set(created_at.into()),
        updated_at: Set(now.into()),
    }
}

fn budget_from_rows(
    row: budgets::Model,
    items: Vec<budget_items::Model>,
) -> Result<Budget, DbError> {
    Ok(Budget {
        id: Some(BudgetId::from_uuid(row.id)),
        project_id: ProjectId::from_uuid(row.project_id),
        budget_type: parse_column("budget_type", &row.budget_type, BudgetType::parse)?,
        status: parse_column("status", &row.status, BudgetStatus::parse)?,
        tax_enabled: row.tax_enabled,
        client_view_enabled: row.client_view_enabled,
        shared_with_construction: row.shared_with_construction,
        notes: row.notes,
        version: row.version,
        published_at: row.published_at.map(|at| at.with_timezone(&Utc)),
        created_at: Some(row.created_at.with_timezone(&Utc)),
        updated_at: Some(row.updated_at.with_timezone(&Utc)),
        selected_nodes: row
            .selected_nodes
            .into_iter()
            .map(CatalogNodeId::from_uuid)
            .collect(),
        items: items.into_iter().map(item_from_row).collect(),
    })
}

fn item_from_row(row: budget_items::Model) -> LineItem {
    let node = |id: Uuid| CatalogNodeId::from_uuid(id);
    LineItem {
        id: Some(LineItemId::from_uuid(row.id)),
        mayor_id: node(row.mayor_id),
        partida_id: row.partida_id.map(node),
        subpartida_id: row.subpartida_id.map(node),
        description: row.description,
        unit: row.unit,
        quantity_real: row.quantity_real,
        waste_pct: row.waste_pct,
        unit_cost: row.unit_cost,
        fee_pct: row.fee_pct,
        supplier_alias: row.supplier_alias,
        order_index: row.order_index,
    }
}

#[cfg(test)]
#[path = "budget_tests.rs"]
mod tests;
