//! Async ports to the persistence backend.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dovita_shared::types::{BudgetId, CatalogNodeId};

use super::error::StoreError;
use crate::budget::Budget;

/// Reads and writes budgets with their items.
#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// Loads a budget and its items ordered by `order_index`.
    async fn load_budget(&self, id: BudgetId) -> Result<Budget, StoreError>;

    /// Upserts the budget row and replaces its items.
    ///
    /// All-or-nothing: on error, the stored budget is left exactly as it was.
    /// Returns the stored budget with its assigned IDs and timestamps.
    async fn save_budget(&self, budget: &Budget) -> Result<Budget, StoreError>;
}

/// One observed supplier price for a subpartida.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Subpartida the price belongs to.
    pub subpartida_id: CatalogNodeId,
    /// Unit cost, always positive.
    pub price: Decimal,
    /// Unit of measure.
    pub unit: String,
    /// Supplier shorthand.
    pub supplier: Option<String>,
}

/// Append-only price history.
#[async_trait]
pub trait PriceHistoryRecorder: Send + Sync {
    /// Appends one sample.
    async fn record(&self, sample: &PriceSample) -> Result<(), StoreError>;
}
