//! In-memory adapters for tests and demos.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use dovita_shared::types::{BudgetId, CatalogNodeId, LineItemId};

use super::error::StoreError;
use super::ports::{BudgetStore, PriceHistoryRecorder, PriceSample};
use crate::budget::Budget;

/// Budget store backed by a map.
///
/// A save swaps the whole budget under one write lock, so readers never see
/// a budget with its items half replaced.
#[derive(Debug)]
pub struct InMemoryBudgetStore {
    budgets: RwLock<HashMap<BudgetId, Budget>>,
    available: AtomicBool,
}

impl InMemoryBudgetStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            budgets: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Makes every later call fail with a backend error until re-enabled.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored budgets.
    pub async fn len(&self) -> usize {
        self.budgets.read().await.len()
    }

    /// Returns true if nothing was saved yet.
    pub async fn is_empty(&self) -> bool {
        self.budgets.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Backend("store unavailable".to_string()))
        }
    }
}

impl Default for InMemoryBudgetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BudgetStore for InMemoryBudgetStore {
    async fn load_budget(&self, id: BudgetId) -> Result<Budget, StoreError> {
        self.check_available()?;
        self.budgets
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "budget",
                id: id.to_string(),
            })
    }

    async fn save_budget(&self, budget: &Budget) -> Result<Budget, StoreError> {
        self.check_available()?;

        let mut budgets = self.budgets.write().await;
        let now = Utc::now();

        let mut stored = budget.clone();
        let id = match stored.id {
            Some(id) => {
                let existing = budgets.get(&id).ok_or_else(|| StoreError::NotFound {
                    entity: "budget",
                    id: id.to_string(),
                })?;
                stored.created_at = existing.created_at;
                id
            }
            None => {
                stored.created_at = Some(now);
                BudgetId::new()
            }
        };
        stored.id = Some(id);
        stored.updated_at = Some(now);

        // Items are replaced wholesale, so every row gets a fresh ID.
        for item in &mut stored.items {
            item.id = Some(LineItemId::new());
        }

        budgets.insert(id, stored.clone());
        Ok(stored)
    }
}

/// Price history kept in a vector.
#[derive(Debug, Default)]
pub struct InMemoryPriceHistory {
    samples: RwLock<Vec<PriceSample>>,
    failing: RwLock<HashSet<CatalogNodeId>>,
}

impl InMemoryPriceHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every later sample for `subpartida_id`.
    pub async fn fail_for(&self, subpartida_id: CatalogNodeId) {
        self.failing.write().await.insert(subpartida_id);
    }

    /// Recorded samples in insertion order.
    pub async fn samples(&self) -> Vec<PriceSample> {
        self.samples.read().await.clone()
    }
}

#[async_trait]
impl PriceHistoryRecorder for InMemoryPriceHistory {
    async fn record(&self, sample: &PriceSample) -> Result<(), StoreError> {
        if self.failing.read().await.contains(&sample.subpartida_id) {
            return Err(StoreError::Backend(format!(
                "price history rejected for {}",
                sample.subpartida_id
            )));
        }
        self.samples.write().await.push(sample.clone());
        Ok(())
    }
}
