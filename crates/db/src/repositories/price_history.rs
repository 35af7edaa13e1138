//! Append-only price history repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use dovita_core::store::{PriceHistoryRecorder, PriceSample, StoreError};
use dovita_shared::types::{CatalogNodeId, PriceSampleId};

use crate::entities::price_history;
use crate::error::DbError;

/// A stored price sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPrice {
    /// Row ID.
    pub id: PriceSampleId,
    /// The sample.
    pub sample: PriceSample,
    /// When it was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Price history repository.
#[derive(Debug, Clone)]
pub struct PriceHistoryRepository {
    db: DatabaseConnection,
}

impl PriceHistoryRepository {
    /// Creates a new price history repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends one sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn append(&self, sample: &PriceSample) -> Result<PriceSampleId, DbError> {
        let id = PriceSampleId::new();
        let row = price_history::ActiveModel {
            id: Set(id.into_inner()),
            subpartida_id: Set(sample.subpartida_id.into_inner()),
            price: Set(sample.price),
            unit: Set(sample.unit.clone()),
            supplier: Set(sample.supplier.clone()),
            recorded_at: Set(Utc::now().into()),
        };

        price_history::Entity::insert(row)
            .exec_without_returning(&self.db)
            .await?;
        Ok(id)
    }

    /// Most recent samples of a subpartida, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn recent(
        &self,
        subpartida_id: CatalogNodeId,
        limit: u64,
    ) -> Result<Vec<RecordedPrice>, DbError> {
        let rows = price_history::Entity::find()
            .filter(price_history::Column::SubpartidaId.eq(subpartida_id.into_inner()))
            .order_by_desc(price_history::Column::RecordedAt)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| RecordedPrice {
                id: PriceSampleId::from_uuid(row.id),
                sample: PriceSample {
                    subpartida_id: CatalogNodeId::from_uuid(row.subpartida_id),
                    price: row.price,
                    unit: row.unit,
                    supplier: row.supplier,
                },
                recorded_at: row.recorded_at.with_timezone(&Utc),
            })
            .collect())
    }
}

#[async_trait]
impl PriceHistoryRecorder for PriceHistoryRepository {
    async fn record(&self, sample: &PriceSample) -> Result<(), StoreError> {
        self.append(sample).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    fn sample() -> PriceSample {
        PriceSample {
            subpartida_id: CatalogNodeId::new(),
            price: dec!(2300),
            unit: "m3".to_string(),
            supplier: Some("CEMEX".to_string()),
        }
    }

    #[tokio::test]
    async fn test_record_appends_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let repo = PriceHistoryRepository::new(db);

        assert!(repo.record(&sample()).await.is_ok());
    }

    #[tokio::test]
    async fn test_recent_maps_rows() {
        let subpartida = Uuid::now_v7();
        let row = price_history::Model {
            id: Uuid::now_v7(),
            subpartida_id: subpartida,
            price: dec!(85.5),
            unit: "m3".to_string(),
            supplier: None,
            recorded_at: Utc::now().into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row.clone()]])
            .into_connection();
        let repo = PriceHistoryRepository::new(db);

        let recent = repo
            .recent(CatalogNodeId::from_uuid(subpartida), 10)
            .await
            .unwrap();

        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id.into_inner(), row.id);
        assert_eq!(recent[0].sample.price, dec!(85.5));
        assert!(recent[0].sample.supplier.is_none());
    }
}
