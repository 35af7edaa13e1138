//! Wizard error types.

use dovita_shared::AppError;
use dovita_shared::types::CatalogNodeId;
use thiserror::Error;

use super::types::WizardStep;
use super::validation::ValidationIssue;
use crate::catalog::NodeType;

/// Errors returned when an event cannot be applied.
#[derive(Debug, Error)]
pub enum WizardError {
    /// The current step does not validate.
    #[error("Cannot leave {step}: {}", join_issues(.issues))]
    Blocked {
        /// Step the user is on.
        step: WizardStep,
        /// Everything that must be fixed first.
        issues: Vec<ValidationIssue>,
    },

    /// `Advance` on the preview step.
    #[error("Preview is the last step")]
    TerminalStep,

    /// The node is not at the level this budget type selects.
    #[error("Node {node} is a {actual}, expected a {expected}")]
    WrongNodeType {
        /// Offending node.
        node: CatalogNodeId,
        /// Level the budget selects.
        expected: NodeType,
        /// Level of the node.
        actual: NodeType,
    },

    /// Deselecting a node that is not selected.
    #[error("Node {0} is not selected")]
    NodeNotSelected(CatalogNodeId),

    /// Item index past the end of the list.
    #[error("Item index {index} is out of range for {len} items")]
    ItemOutOfRange {
        /// Requested index.
        index: usize,
        /// Current item count.
        len: usize,
    },

    /// Client view or construction sharing toggled on a parametric budget.
    #[error("Flag `{0}` is only available on executive budgets")]
    ExecutiveOnlyFlag(&'static str),

    /// Flushing a session that has no project.
    #[error("No project selected")]
    ProjectNotSelected,
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl WizardError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Blocked { .. } => "STEP_BLOCKED",
            Self::TerminalStep => "TERMINAL_STEP",
            Self::WrongNodeType { .. } => "WRONG_NODE_TYPE",
            Self::NodeNotSelected(_) => "NODE_NOT_SELECTED",
            Self::ItemOutOfRange { .. } => "ITEM_OUT_OF_RANGE",
            Self::ExecutiveOnlyFlag(_) => "EXECUTIVE_ONLY_FLAG",
            Self::ProjectNotSelected => "PROJECT_NOT_SELECTED",
        }
    }
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::Blocked { .. }
            | WizardError::WrongNodeType { .. }
            | WizardError::ItemOutOfRange { .. }
            | WizardError::NodeNotSelected(_)
            | WizardError::ProjectNotSelected => Self::Validation(err.to_string()),
            WizardError::TerminalStep | WizardError::ExecutiveOnlyFlag(_) => {
                Self::BusinessRule(err.to_string())
            }
        }
    }
}
