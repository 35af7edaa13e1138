//! Step predicates of the budget builder.
//!
//! Failures are values shown to the user next to the offending field, never
//! panics or silent skips.

use serde::{Deserialize, Serialize};
use std::fmt;

use dovita_shared::types::{CatalogNodeId, ProjectId};

use super::types::SelectionSet;
use crate::budget::{BudgetService, BudgetType, ItemDefect, LineItem};
use crate::catalog::NodeType;

/// A reason the wizard cannot move on or publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// No project chosen.
    ProjectNotSelected,
    /// The selection is empty.
    NoNodesSelected {
        /// Level the user has to pick.
        node_type: NodeType,
    },
    /// The item list is empty.
    NoItems,
    /// An item is incomplete.
    IncompleteItem {
        /// One-based item position.
        position: usize,
        /// What is wrong.
        defect: ItemDefect,
        /// Variant, for the message wording.
        budget_type: BudgetType,
    },
    /// An item belongs to a node that is no longer selected.
    OrphanedItem {
        /// One-based item position.
        position: usize,
        /// The deselected node.
        node_id: CatalogNodeId,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProjectNotSelected => write!(f, "Select a project"),
            Self::NoNodesSelected { node_type } => {
                write!(f, "Select at least one {node_type}")
            }
            Self::NoItems => write!(f, "Add at least one line item"),
            Self::IncompleteItem {
                position,
                defect,
                budget_type,
            } => write!(f, "Item {position}: {}", defect.describe(*budget_type)),
            Self::OrphanedItem { position, .. } => write!(
                f,
                "Item {position} belongs to a catalog node that is no longer selected"
            ),
        }
    }
}

/// ProjectInfo predicate.
pub(crate) fn project_issues(project_id: Option<ProjectId>) -> Vec<ValidationIssue> {
    if project_id.is_some() {
        Vec::new()
    } else {
        vec![ValidationIssue::ProjectNotSelected]
    }
}

/// NodeSelection predicate.
pub(crate) fn selection_issues(
    selection: &SelectionSet,
    budget_type: BudgetType,
) -> Vec<ValidationIssue> {
    if selection.is_empty() {
        vec![ValidationIssue::NoNodesSelected {
            node_type: budget_type.selection_node_type(),
        }]
    } else {
        Vec::new()
    }
}

/// ItemConfiguration predicate: at least one item, every item complete and
/// attached to a selected node.
pub(crate) fn item_issues(
    items: &[LineItem],
    selection: &SelectionSet,
    budget_type: BudgetType,
) -> Vec<ValidationIssue> {
    if items.is_empty() {
        return vec![ValidationIssue::NoItems];
    }

    let key = budget_type.group_key();
    let mut issues = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let position = index + 1;
        for defect in BudgetService::item_defects(item, budget_type) {
            issues.push(ValidationIssue::IncompleteItem {
                position,
                defect,
                budget_type,
            });
        }
        if let Some(node_id) = item.node_key(key)
            && !selection.contains(node_id)
        {
            issues.push(ValidationIssue::OrphanedItem { position, node_id });
        }
    }

    issues
}
