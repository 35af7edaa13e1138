//! Save orchestration: validate, persist, then record price history.

use chrono::Utc;
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use dovita_shared::config::BudgetConfig;
use dovita_shared::OrphanPolicy;
use dovita_shared::types::{BudgetId, CatalogNodeId};

use super::error::{SaveError, StoreError};
use super::ports::{BudgetStore, PriceHistoryRecorder, PriceSample};
use crate::budget::{Budget, BudgetService, BudgetStatus, LineItem};
use crate::wizard::{ValidationIssue, WizardState};

/// A price sample that could not be recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceHistoryFailure {
    /// One-based item position in the saved budget.
    pub position: usize,
    /// Subpartida of the sample.
    pub subpartida_id: CatalogNodeId,
    /// Backend message.
    pub message: String,
}

/// Outcome of the price history batch that follows a save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriceHistoryReport {
    /// Samples sent to the recorder.
    pub attempted: usize,
    /// Samples stored.
    pub recorded: usize,
    /// Samples rejected, in item order.
    pub failures: Vec<PriceHistoryFailure>,
}

impl PriceHistoryReport {
    /// Returns true if every sample was stored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of a successful save.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    /// ID of the stored budget.
    pub budget_id: BudgetId,
    /// Status the budget was stored with.
    pub status: BudgetStatus,
    /// The stored budget, with the IDs assigned by the store.
    pub budget: Budget,
    /// Price history batch result. Failures here never undo the save.
    pub price_history: PriceHistoryReport,
}

/// Saves wizard sessions through the persistence ports.
#[derive(Clone)]
pub struct BudgetSaver {
    store: Arc<dyn BudgetStore>,
    recorder: Arc<dyn PriceHistoryRecorder>,
    record_price_history: bool,
}

impl BudgetSaver {
    /// Creates a saver over the given ports.
    #[must_use]
    pub fn new(
        store: Arc<dyn BudgetStore>,
        recorder: Arc<dyn PriceHistoryRecorder>,
        config: &BudgetConfig,
    ) -> Self {
        Self {
            store,
            recorder,
            record_price_history: config.record_price_history,
        }
    }

    /// Reopens a stored budget as a wizard session.
    ///
    /// # Errors
    ///
    /// Returns the store error if the budget cannot be loaded.
    pub async fn open(
        &self,
        id: BudgetId,
        orphan_policy: OrphanPolicy,
    ) -> Result<WizardState, StoreError> {
        let budget = self.store.load_budget(id).await?;
        Ok(WizardState::resume(budget, orphan_policy))
    }

    /// Persists the session as a draft or publishes it.
    ///
    /// Publishing requires the compound gate of the wizard to be clean; a
    /// draft only needs a project. The state is borrowed, so it is still
    /// there to retry with when this fails.
    ///
    /// # Errors
    ///
    /// Returns `SaveError::Validation` with the open issues, the lifecycle
    /// error from `BudgetService::prepare_save`, or the store error.
    pub async fn save(&self, state: &WizardState, publish: bool) -> Result<SaveOutcome, SaveError> {
        if publish {
            let issues = state.validation_issues();
            if !issues.is_empty() {
                return Err(SaveError::Validation(issues));
            }
        } else if state.project_id().is_none() {
            return Err(SaveError::Validation(vec![ValidationIssue::ProjectNotSelected]));
        }

        let budget = BudgetService::prepare_save(state.to_budget()?, publish, Utc::now())?;
        let stored = self.store.save_budget(&budget).await?;
        let budget_id = stored
            .id
            .ok_or_else(|| StoreError::InvalidData("stored budget has no id".to_string()))?;

        info!(
            budget_id = %budget_id,
            budget_type = %stored.budget_type,
            status = %stored.status,
            items = stored.items.len(),
            "Budget saved"
        );

        let price_history = if self.record_price_history {
            self.record_prices(&stored.items).await
        } else {
            PriceHistoryReport::default()
        };

        Ok(SaveOutcome {
            budget_id,
            status: stored.status,
            budget: stored,
            price_history,
        })
    }

    /// Records one sample per priced subpartida item, concurrently.
    async fn record_prices(&self, items: &[LineItem]) -> PriceHistoryReport {
        let samples: Vec<(usize, PriceSample)> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| price_sample(item).map(|sample| (index + 1, sample)))
            .collect();

        let results = join_all(
            samples
                .iter()
                .map(|(_, sample)| self.recorder.record(sample)),
        )
        .await;

        let mut report = PriceHistoryReport {
            attempted: samples.len(),
            ..PriceHistoryReport::default()
        };
        for ((position, sample), result) in samples.iter().zip(results) {
            match result {
                Ok(()) => report.recorded += 1,
                Err(err) => {
                    warn!(
                        position,
                        subpartida_id = %sample.subpartida_id,
                        error = %err,
                        "Failed to record price history"
                    );
                    report.failures.push(PriceHistoryFailure {
                        position: *position,
                        subpartida_id: sample.subpartida_id,
                        message: err.to_string(),
                    });
                }
            }
        }
        report
    }
}

/// Price sample for items that carry a subpartida and a positive cost.
fn price_sample(item: &LineItem) -> Option<PriceSample> {
    let subpartida_id = item.subpartida_id?;
    (item.unit_cost > Decimal::ZERO).then(|| PriceSample {
        subpartida_id,
        price: item.unit_cost,
        unit: item.unit.clone(),
        supplier: item.supplier_alias.clone(),
    })
}

#[cfg(test)]
#[path = "saver_tests.rs"]
mod tests;
