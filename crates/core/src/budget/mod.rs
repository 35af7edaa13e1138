//! Line-item costing, budget rollups and budget lifecycle.

pub mod aggregator;
pub mod calculator;
pub mod error;
pub mod service;
pub mod types;


pub use aggregator::{BudgetSummary, GroupKey, GroupSubtotal, IVA_RATE};
pub use calculator::ItemCost;
pub use error::BudgetError;
pub use service::{BudgetService, ItemDefect};
pub use types::{Budget, BudgetStatus, BudgetType, LineItem};
