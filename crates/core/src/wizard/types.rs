//! Wizard domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

use dovita_shared::types::{CatalogNodeId, ProjectId};

use crate::budget::LineItem;
use crate::catalog::CatalogNode;

/// Steps of the budget builder, shared by both budget variants.
///
/// Moving forward requires the current step to validate; moving back is
/// always allowed down to `ProjectInfo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Pick the project and budget options.
    #[default]
    ProjectInfo,
    /// Pick mayores (parametric) or subpartidas (executive).
    NodeSelection,
    /// Enter quantities and costs.
    ItemConfiguration,
    /// Review totals, then save or publish.
    Preview,
}

impl WizardStep {
    /// One-based step number as shown to the user.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::ProjectInfo => 1,
            Self::NodeSelection => 2,
            Self::ItemConfiguration => 3,
            Self::Preview => 4,
        }
    }

    /// The following step, `None` at `Preview`.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::ProjectInfo => Some(Self::NodeSelection),
            Self::NodeSelection => Some(Self::ItemConfiguration),
            Self::ItemConfiguration => Some(Self::Preview),
            Self::Preview => None,
        }
    }

    /// The preceding step, `None` at `ProjectInfo`.
    #[must_use]
    pub const fn previous(&self) -> Option<Self> {
        match self {
            Self::ProjectInfo => None,
            Self::NodeSelection => Some(Self::ProjectInfo),
            Self::ItemConfiguration => Some(Self::NodeSelection),
            Self::Preview => Some(Self::ItemConfiguration),
        }
    }

    /// Returns the string representation of the step.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectInfo => "project info",
            Self::NodeSelection => "node selection",
            Self::ItemConfiguration => "item configuration",
            Self::Preview => "preview",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Catalog nodes picked by the user, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    nodes: Vec<CatalogNodeId>,
}

impl SelectionSet {
    /// Builds a set from IDs, dropping repeats but keeping first positions.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = CatalogNodeId>) -> Self {
        let mut set = Self::default();
        for id in ids {
            set.insert(id);
        }
        set
    }

    /// Appends a node; returns false if it was already selected.
    pub fn insert(&mut self, id: CatalogNodeId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.nodes.push(id);
        true
    }

    /// Removes a node; returns false if it was not selected.
    pub fn remove(&mut self, id: CatalogNodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|node| *node != id);
        self.nodes.len() != before
    }

    /// Returns true if the node is selected.
    #[must_use]
    pub fn contains(&self, id: CatalogNodeId) -> bool {
        self.nodes.contains(&id)
    }

    /// Selected nodes in selection order.
    #[must_use]
    pub fn as_slice(&self) -> &[CatalogNodeId] {
        &self.nodes
    }

    /// Number of selected nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// User actions fed into [`WizardState::apply`](super::WizardState::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    /// Choose the project the budget belongs to.
    SelectProject(ProjectId),
    /// Add a catalog node to the selection.
    SelectNode(CatalogNode),
    /// Remove a catalog node from the selection.
    DeselectNode(CatalogNodeId),
    /// Append a line item.
    AddItem(LineItem),
    /// Replace the item at `index`.
    UpdateItem {
        /// Zero-based position.
        index: usize,
        /// New contents.
        item: LineItem,
    },
    /// Remove the item at the given zero-based position.
    RemoveItem(usize),
    /// Move an item to another position.
    MoveItem {
        /// Current zero-based position.
        from: usize,
        /// Target zero-based position.
        to: usize,
    },
    /// Toggle IVA.
    SetTaxEnabled(bool),
    /// Toggle client portal visibility (executive only).
    SetClientView(bool),
    /// Toggle sharing with the construction team (executive only).
    SetSharedWithConstruction(bool),
    /// Replace the notes.
    SetNotes(Option<String>),
    /// Go to the next step if the current one validates.
    Advance,
    /// Go to the previous step.
    Retreat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_navigation() {
        assert_eq!(WizardStep::ProjectInfo.next(), Some(WizardStep::NodeSelection));
        assert_eq!(WizardStep::Preview.next(), None);
        assert_eq!(WizardStep::ProjectInfo.previous(), None);
        assert_eq!(WizardStep::Preview.previous(), Some(WizardStep::ItemConfiguration));
        assert_eq!(WizardStep::ItemConfiguration.number(), 3);
    }

    #[test]
    fn test_selection_set_keeps_insertion_order() {
        let a = CatalogNodeId::new();
        let b = CatalogNodeId::new();
        let c = CatalogNodeId::new();

        let mut set = SelectionSet::from_ids([c, a, c, b]);
        assert_eq!(set.as_slice(), &[c, a, b]);

        assert!(!set.insert(a));
        assert!(set.remove(a));
        assert!(!set.remove(a));
        assert_eq!(set.as_slice(), &[c, b]);
        assert_eq!(set.len(), 2);
    }
}
