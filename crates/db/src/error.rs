//! Database error types.

use dovita_core::store::StoreError;
use dovita_shared::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the repositories.
#[derive(Debug, Error)]
pub enum DbError {
    /// Record not found.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Table-level entity name.
        entity: &'static str,
        /// Primary key.
        id: Uuid,
    },

    /// A text column holds a value no domain enum accepts.
    #[error("Invalid {column} value `{value}`")]
    InvalidEnum {
        /// Column name.
        column: &'static str,
        /// Stored value.
        value: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl DbError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidEnum { .. } => "INVALID_STORED_DATA",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => Self::NotFound {
                entity,
                id: id.to_string(),
            },
            DbError::InvalidEnum { .. } => Self::InvalidData(err.to_string()),
            DbError::Database(db_err) => Self::Backend(db_err.to_string()),
        }
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        StoreError::from(err).into()
    }
}

/// Parses a text column into a domain enum.
pub(crate) fn parse_column<T>(
    column: &'static str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, DbError> {
    parse(value).ok_or_else(|| DbError::InvalidEnum {
        column,
        value: value.to_string(),
    })
}
