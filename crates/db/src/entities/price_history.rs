//! `SeaORM` Entity for price_history table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "price_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub subpartida_id: Uuid,
    #[sea_orm(column_type = "Decimal(None)")]
    pub price: Decimal,
    pub unit: String,
    pub supplier: Option<String>,
    pub recorded_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::catalog_nodes::Entity",
        from = "Column::SubpartidaId",
        to = "super::catalog_nodes::Column::Id"
    )]
    CatalogNodes,
}

impl Related<super::catalog_nodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogNodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
