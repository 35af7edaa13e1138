//! Persistence error types.

use dovita_shared::AppError;
use thiserror::Error;

use crate::budget::BudgetError;
use crate::wizard::{ValidationIssue, WizardError};

/// Errors reported by storage adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// Its identifier.
        id: String,
    },

    /// The backend could not be reached or rejected the operation.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// A stored value could not be mapped to a domain type.
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Backend(_) => "STORAGE_BACKEND_ERROR",
            Self::InvalidData(_) => "INVALID_STORED_DATA",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::Backend(msg) => Self::Database(msg),
            StoreError::InvalidData(msg) => Self::Internal(msg),
        }
    }
}

/// Errors returned by [`BudgetSaver::save`](super::BudgetSaver::save).
///
/// The wizard state is borrowed during a save, so it survives every one of
/// these and the user can retry.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The session has open issues that block the requested save.
    #[error("Budget cannot be saved: {} issue(s) open", .0.len())]
    Validation(Vec<ValidationIssue>),

    /// The session could not be flushed into a budget.
    #[error(transparent)]
    Wizard(#[from] WizardError),

    /// The budget violates a lifecycle rule.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SaveError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Wizard(err) => err.error_code(),
            Self::Budget(err) => err.error_code(),
            Self::Store(err) => err.error_code(),
        }
    }
}

impl From<SaveError> for AppError {
    fn from(err: SaveError) -> Self {
        match err {
            SaveError::Validation(issues) => Self::Validation(
                issues
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            SaveError::Wizard(err) => err.into(),
            SaveError::Budget(err) => err.into(),
            SaveError::Store(err) => err.into(),
        }
    }
}
