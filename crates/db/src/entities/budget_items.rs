//! `SeaORM` Entity for budget_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub budget_id: Uuid,
    pub mayor_id: Uuid,
    pub partida_id: Option<Uuid>,
    pub subpartida_id: Option<Uuid>,
    pub description: String,
    pub unit: String,
    #[sea_orm(column_type = "Decimal(None)")]
    pub quantity_real: Decimal,
    #[sea_orm(column_type = "Decimal(None)")]
    pub waste_pct: Decimal,
    #[sea_orm(column_type = "Decimal(None)")]
    pub unit_cost: Decimal,
    #[sea_orm(column_type = "Decimal(None)")]
    pub fee_pct: Decimal,
    pub supplier_alias: Option<String>,
    pub order_index: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budgets::Entity",
        from = "Column::BudgetId",
        to = "super::budgets::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Budgets,
    #[sea_orm(
        belongs_to = "super::catalog_nodes::Entity",
        from = "Column::MayorId",
        to = "super::catalog_nodes::Column::Id"
    )]
    Mayor,
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
