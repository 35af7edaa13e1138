//! Budget service for validation, save preparation and rollups.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dovita_shared::types::CatalogNodeId;

use super::aggregator::{self, BudgetSummary};
use super::error::BudgetError;
use super::types::{Budget, BudgetStatus, BudgetType, LineItem};

/// Reason a line item is not ready for publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemDefect {
    /// The partida (parametric) or subpartida (executive) is missing.
    MissingLeaf,
    /// Unit cost is zero or negative.
    NonPositiveUnitCost,
    /// Real quantity is zero or negative.
    NonPositiveQuantity,
}

impl ItemDefect {
    /// Short user-facing description.
    #[must_use]
    pub fn describe(self, budget_type: BudgetType) -> &'static str {
        match (self, budget_type) {
            (Self::MissingLeaf, BudgetType::Parametric) => "a partida must be selected",
            (Self::MissingLeaf, BudgetType::Executive) => "a subpartida must be selected",
            (Self::NonPositiveUnitCost, _) => "unit cost must be greater than zero",
            (Self::NonPositiveQuantity, _) => "quantity must be greater than zero",
        }
    }
}

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Checks the invariants a budget must hold regardless of its status.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::ExecutiveOnlyFlag` if a parametric budget carries
    /// executive-only flags, `BudgetError::InvalidVersion` for versions below one.
    pub fn validate(budget: &Budget) -> Result<(), BudgetError> {
        if budget.budget_type == BudgetType::Parametric {
            if budget.client_view_enabled {
                return Err(BudgetError::ExecutiveOnlyFlag("client_view_enabled"));
            }
            if budget.shared_with_construction {
                return Err(BudgetError::ExecutiveOnlyFlag("shared_with_construction"));
            }
        }

        if budget.version < 1 {
            return Err(BudgetError::InvalidVersion(budget.version));
        }

        Ok(())
    }

    /// Lists what keeps `item` from being publishable.
    #[must_use]
    pub fn item_defects(item: &LineItem, budget_type: BudgetType) -> Vec<ItemDefect> {
        let mut defects = Vec::new();
        if item.required_leaf(budget_type).is_none() {
            defects.push(ItemDefect::MissingLeaf);
        }
        if item.unit_cost <= Decimal::ZERO {
            defects.push(ItemDefect::NonPositiveUnitCost);
        }
        if item.quantity_real <= Decimal::ZERO {
            defects.push(ItemDefect::NonPositiveQuantity);
        }
        defects
    }

    /// Produces the snapshot that gets persisted.
    ///
    /// Items are renumbered from zero in their current order and negative
    /// cost inputs are stored as zero, the value the calculator already
    /// used for them. Publishing stamps `published_at` the first time and
    /// keeps it afterwards; saving as draft clears it.
    ///
    /// # Errors
    ///
    /// Returns the `validate` errors, plus `NothingToPublish` or
    /// `IncompleteItem` when publishing a budget that is not complete.
    pub fn prepare_save(
        mut budget: Budget,
        publish: bool,
        now: DateTime<Utc>,
    ) -> Result<Budget, BudgetError> {
        Self::validate(&budget)?;

        if publish {
            if budget.items.is_empty() {
                return Err(BudgetError::NothingToPublish);
            }
            for (index, item) in budget.items.iter().enumerate() {
                if let Some(defect) = Self::item_defects(item, budget.budget_type).first() {
                    return Err(BudgetError::IncompleteItem {
                        position: index + 1,
                        reason: defect.describe(budget.budget_type),
                    });
                }
            }
        }

        for (index, item) in budget.items.iter_mut().enumerate() {
            item.order_index = i32::try_from(index).unwrap_or(i32::MAX);
            clamp_inputs(item);
        }

        if publish {
            budget.status = BudgetStatus::Published;
            budget.published_at = budget.published_at.or(Some(now));
        } else {
            budget.status = BudgetStatus::Draft;
            budget.published_at = None;
        }

        Ok(budget)
    }

    /// Rolls up a budget using the grouping implied by its type.
    ///
    /// When `group_order` is empty, groups follow the first appearance of
    /// their node among the items.
    #[must_use]
    pub fn summarize(budget: &Budget, group_order: &[CatalogNodeId]) -> BudgetSummary {
        let derived;
        let order = if group_order.is_empty() {
            derived = budget.selection_order();
            derived.as_slice()
        } else {
            group_order
        };

        aggregator::summarize(
            &budget.items,
            budget.budget_type.group_key(),
            order,
            budget.tax_enabled,
        )
    }
}

fn clamp_inputs(item: &mut LineItem) {
    for value in [
        &mut item.quantity_real,
        &mut item.waste_pct,
        &mut item.unit_cost,
        &mut item.fee_pct,
    ] {
        *value = (*value).max(Decimal::ZERO);
    }
}
