//! Budget error types.

use dovita_shared::AppError;
use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Client view or construction sharing set on a parametric budget.
    #[error("Flag `{0}` is only available on executive budgets")]
    ExecutiveOnlyFlag(&'static str),

    /// Publishing requires at least one item.
    #[error("A budget needs at least one line item to be published")]
    NothingToPublish,

    /// Publishing requires every item to be complete.
    #[error("Line item {position} is incomplete: {reason}")]
    IncompleteItem {
        /// One-based position of the item.
        position: usize,
        /// What is missing.
        reason: &'static str,
    },

    /// Version numbers start at one.
    #[error("Invalid budget version: {0}")]
    InvalidVersion(i32),
}

impl BudgetError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ExecutiveOnlyFlag(_) => "EXECUTIVE_ONLY_FLAG",
            Self::NothingToPublish => "NOTHING_TO_PUBLISH",
            Self::IncompleteItem { .. } => "INCOMPLETE_ITEM",
            Self::InvalidVersion(_) => "INVALID_VERSION",
        }
    }
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        Self::BusinessRule(err.to_string())
    }
}
