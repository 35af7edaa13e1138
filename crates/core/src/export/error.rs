//! Export error types.

use dovita_shared::AppError;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors that can occur while building an export snapshot.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A group node is missing from the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Client exports need an executive budget with client view enabled.
    #[error("Client view is not enabled for this budget")]
    ClientViewDisabled,
}

impl ExportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Catalog(err) => err.error_code(),
            Self::ClientViewDisabled => "CLIENT_VIEW_DISABLED",
        }
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Catalog(err) => err.into(),
            ExportError::ClientViewDisabled => Self::BusinessRule(err.to_string()),
        }
    }
}
