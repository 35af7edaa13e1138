//! Catalog error types.

use dovita_shared::AppError;
use dovita_shared::types::CatalogNodeId;
use thiserror::Error;

use super::types::NodeType;
use crate::store::StoreError;

/// Errors raised while building or querying the catalog tree.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two nodes share the same ID.
    #[error("Duplicate catalog node: {0}")]
    DuplicateNode(CatalogNodeId),

    /// A node references a parent that is not part of the catalog.
    #[error("Catalog node {node} references unknown parent {parent}")]
    UnknownParent {
        /// The child node.
        node: CatalogNodeId,
        /// The missing parent.
        parent: CatalogNodeId,
    },

    /// A parent is not exactly one level above its child.
    #[error("Catalog node {node} of type {child_type} cannot hang from a {parent_type}")]
    InvalidNesting {
        /// The child node.
        node: CatalogNodeId,
        /// Type of the child.
        child_type: NodeType,
        /// Type of the parent.
        parent_type: NodeType,
    },

    /// A non-department node has no parent.
    #[error("Catalog node {node} of type {node_type} has no parent")]
    MissingParent {
        /// The orphan node.
        node: CatalogNodeId,
        /// Its type.
        node_type: NodeType,
    },

    /// A department declares a parent.
    #[error("Department {0} cannot have a parent")]
    DepartmentWithParent(CatalogNodeId),

    /// A lookup referenced a node the tree does not contain.
    #[error("Catalog node not found: {0}")]
    NodeNotFound(CatalogNodeId),

    /// A node was used where another level was expected.
    #[error("Catalog node {node} is a {actual}, expected a {expected}")]
    UnexpectedType {
        /// The node.
        node: CatalogNodeId,
        /// Expected type.
        expected: NodeType,
        /// Actual type.
        actual: NodeType,
    },

    /// The catalog could not be read from its source.
    #[error("Catalog source error: {0}")]
    Source(#[from] StoreError),
}

impl CatalogError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateNode(_) => "CATALOG_DUPLICATE_NODE",
            Self::UnknownParent { .. } => "CATALOG_UNKNOWN_PARENT",
            Self::InvalidNesting { .. } => "CATALOG_INVALID_NESTING",
            Self::MissingParent { .. } => "CATALOG_MISSING_PARENT",
            Self::DepartmentWithParent(_) => "CATALOG_DEPARTMENT_WITH_PARENT",
            Self::NodeNotFound(_) => "CATALOG_NODE_NOT_FOUND",
            Self::UnexpectedType { .. } => "CATALOG_UNEXPECTED_TYPE",
            Self::Source(_) => "CATALOG_SOURCE_ERROR",
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NodeNotFound(_) => Self::NotFound(err.to_string()),
            CatalogError::UnexpectedType { .. } => Self::Validation(err.to_string()),
            CatalogError::Source(source) => source.into(),
            _ => Self::Internal(err.to_string()),
        }
    }
}
