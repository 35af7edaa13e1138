//! The budget builder session as an immutable value.

use chrono::{DateTime, Utc};
use tracing::debug;

use dovita_shared::OrphanPolicy;
use dovita_shared::types::{BudgetId, ProjectId};

use super::error::WizardError;
use super::types::{SelectionSet, WizardEvent, WizardStep};
use super::validation::{self, ValidationIssue};
use crate::budget::{Budget, BudgetStatus, BudgetSummary, BudgetType, LineItem, aggregator};

/// One wizard session.
///
/// Every user action goes through [`WizardState::apply`], which borrows the
/// state and returns the next one. A rejected event leaves the current value
/// untouched, so the user can correct the input and try again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    budget_id: Option<BudgetId>,
    budget_type: BudgetType,
    step: WizardStep,
    project_id: Option<ProjectId>,
    selection: SelectionSet,
    items: Vec<LineItem>,
    tax_enabled: bool,
    client_view_enabled: bool,
    shared_with_construction: bool,
    notes: Option<String>,
    version: i32,
    status: BudgetStatus,
    published_at: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
    orphan_policy: OrphanPolicy,
}

impl WizardState {
    /// Starts an empty session at `ProjectInfo`.
    #[must_use]
    pub fn new(budget_type: BudgetType, orphan_policy: OrphanPolicy) -> Self {
        Self {
            budget_id: None,
            budget_type,
            step: WizardStep::ProjectInfo,
            project_id: None,
            selection: SelectionSet::default(),
            items: Vec::new(),
            tax_enabled: false,
            client_view_enabled: false,
            shared_with_construction: false,
            notes: None,
            version: 1,
            status: BudgetStatus::Draft,
            published_at: None,
            created_at: None,
            orphan_policy,
        }
    }

    /// Reopens a stored budget for editing.
    ///
    /// The selection comes from the stored `selected_nodes`. Budgets saved
    /// without one fall back to the group nodes of the items in order of
    /// first appearance.
    #[must_use]
    pub fn resume(budget: Budget, orphan_policy: OrphanPolicy) -> Self {
        let selection = SelectionSet::from_ids(budget.selection_order());
        Self {
            budget_id: budget.id,
            budget_type: budget.budget_type,
            step: WizardStep::ProjectInfo,
            project_id: Some(budget.project_id),
            selection,
            items: budget.items,
            tax_enabled: budget.tax_enabled,
            client_view_enabled: budget.client_view_enabled,
            shared_with_construction: budget.shared_with_construction,
            notes: budget.notes,
            version: budget.version,
            status: budget.status,
            published_at: budget.published_at,
            created_at: budget.created_at,
            orphan_policy,
        }
    }

    /// Applies one user action.
    ///
    /// # Errors
    ///
    /// Returns a `WizardError` describing why the event was rejected; `self`
    /// is unchanged in that case.
    pub fn apply(&self, event: WizardEvent) -> Result<Self, WizardError> {
        let mut next = self.clone();
        next.reduce(event)?;
        Ok(next)
    }

    fn reduce(&mut self, event: WizardEvent) -> Result<(), WizardError> {
        match event {
            WizardEvent::SelectProject(project_id) => {
                self.project_id = Some(project_id);
            }
            WizardEvent::SelectNode(node) => {
                let expected = self.budget_type.selection_node_type();
                if node.node_type != expected {
                    return Err(WizardError::WrongNodeType {
                        node: node.id,
                        expected,
                        actual: node.node_type,
                    });
                }
                self.selection.insert(node.id);
            }
            WizardEvent::DeselectNode(node_id) => {
                if !self.selection.remove(node_id) {
                    return Err(WizardError::NodeNotSelected(node_id));
                }
                if self.orphan_policy == OrphanPolicy::Remove {
                    let key = self.budget_type.group_key();
                    let before = self.items.len();
                    self.items.retain(|item| item.node_key(key) != Some(node_id));
                    debug!(
                        node_id = %node_id,
                        removed = before - self.items.len(),
                        "Dropped items of deselected node"
                    );
                }
            }
            WizardEvent::AddItem(item) => self.items.push(item),
            WizardEvent::UpdateItem { index, item } => {
                self.check_index(index)?;
                self.items[index] = item;
            }
            WizardEvent::RemoveItem(index) => {
                self.check_index(index)?;
                self.items.remove(index);
            }
            WizardEvent::MoveItem { from, to } => {
                self.check_index(from)?;
                self.check_index(to)?;
                let item = self.items.remove(from);
                self.items.insert(to, item);
            }
            WizardEvent::SetTaxEnabled(enabled) => self.tax_enabled = enabled,
            WizardEvent::SetClientView(enabled) => {
                self.check_executive_flag("client_view_enabled", enabled)?;
                self.client_view_enabled = enabled;
            }
            WizardEvent::SetSharedWithConstruction(enabled) => {
                self.check_executive_flag("shared_with_construction", enabled)?;
                self.shared_with_construction = enabled;
            }
            WizardEvent::SetNotes(notes) => {
                self.notes = notes.filter(|text| !text.trim().is_empty());
            }
            WizardEvent::Advance => self.step = self.next_step()?,
            WizardEvent::Retreat => {
                self.step = self.step.previous().unwrap_or(WizardStep::ProjectInfo);
            }
        }
        Ok(())
    }

    /// Moves to the next step if the current one validates.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::Blocked` with the failing predicates, or
    /// `WizardError::TerminalStep` on `Preview`.
    pub fn advance(&self) -> Result<Self, WizardError> {
        self.apply(WizardEvent::Advance)
    }

    /// Moves one step back, staying on `ProjectInfo` at the start.
    #[must_use]
    pub fn retreat(&self) -> Self {
        Self {
            step: self.step.previous().unwrap_or(WizardStep::ProjectInfo),
            ..self.clone()
        }
    }

    fn next_step(&self) -> Result<WizardStep, WizardError> {
        let next = self.step.next().ok_or(WizardError::TerminalStep)?;
        let issues = self.step_issues(self.step);
        if issues.is_empty() {
            Ok(next)
        } else {
            Err(WizardError::Blocked {
                step: self.step,
                issues,
            })
        }
    }

    /// Issues of a single step's predicate. `Preview` has none of its own.
    #[must_use]
    pub fn step_issues(&self, step: WizardStep) -> Vec<ValidationIssue> {
        match step {
            WizardStep::ProjectInfo => validation::project_issues(self.project_id),
            WizardStep::NodeSelection => {
                validation::selection_issues(&self.selection, self.budget_type)
            }
            WizardStep::ItemConfiguration => {
                validation::item_issues(&self.items, &self.selection, self.budget_type)
            }
            WizardStep::Preview => Vec::new(),
        }
    }

    /// Every issue across the three validating steps.
    #[must_use]
    pub fn validation_issues(&self) -> Vec<ValidationIssue> {
        [
            WizardStep::ProjectInfo,
            WizardStep::NodeSelection,
            WizardStep::ItemConfiguration,
        ]
        .into_iter()
        .flat_map(|step| self.step_issues(step))
        .collect()
    }

    /// The gate controlling the save and publish actions on `Preview`.
    #[must_use]
    pub fn has_validation_errors(&self) -> bool {
        !self.validation_issues().is_empty()
    }

    /// Returns true if `Advance` would succeed.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.step.next().is_some() && self.step_issues(self.step).is_empty()
    }

    /// Returns true if the session may be published.
    #[must_use]
    pub fn can_publish(&self) -> bool {
        !self.has_validation_errors()
    }

    /// Live totals, grouped in selection order.
    #[must_use]
    pub fn summary(&self) -> BudgetSummary {
        aggregator::summarize(
            &self.items,
            self.budget_type.group_key(),
            self.selection.as_slice(),
            self.tax_enabled,
        )
    }

    /// Flushes the session into a budget snapshot.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::ProjectNotSelected` if no project was chosen.
    pub fn to_budget(&self) -> Result<Budget, WizardError> {
        let project_id = self.project_id.ok_or(WizardError::ProjectNotSelected)?;
        Ok(Budget {
            id: self.budget_id,
            project_id,
            budget_type: self.budget_type,
            tax_enabled: self.tax_enabled,
            client_view_enabled: self.client_view_enabled,
            shared_with_construction: self.shared_with_construction,
            status: self.status,
            notes: self.notes.clone(),
            version: self.version,
            published_at: self.published_at,
            created_at: self.created_at,
            updated_at: None,
            selected_nodes: self.selection.as_slice().to_vec(),
            items: self.items.clone(),
        })
    }

    /// Takes over what the store assigned on save, keeping the step and
    /// selection.
    #[must_use]
    pub fn mark_saved(mut self, budget: &Budget) -> Self {
        self.budget_id = budget.id;
        self.status = budget.status;
        self.version = budget.version;
        self.published_at = budget.published_at;
        self.created_at = budget.created_at;
        self.items.clone_from(&budget.items);
        self
    }

    fn check_index(&self, index: usize) -> Result<(), WizardError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(WizardError::ItemOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    fn check_executive_flag(&self, flag: &'static str, enabled: bool) -> Result<(), WizardError> {
        if enabled && self.budget_type == BudgetType::Parametric {
            Err(WizardError::ExecutiveOnlyFlag(flag))
        } else {
            Ok(())
        }
    }

    /// Saved budget ID, `None` for a new budget.
    #[must_use]
    pub fn budget_id(&self) -> Option<BudgetId> {
        self.budget_id
    }

    /// Budget variant.
    #[must_use]
    pub fn budget_type(&self) -> BudgetType {
        self.budget_type
    }

    /// Current step.
    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Selected project.
    #[must_use]
    pub fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    /// Selected catalog nodes.
    #[must_use]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Line items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Whether IVA is applied.
    #[must_use]
    pub fn tax_enabled(&self) -> bool {
        self.tax_enabled
    }

    /// Client portal visibility.
    #[must_use]
    pub fn client_view_enabled(&self) -> bool {
        self.client_view_enabled
    }

    /// Shared with the construction team.
    #[must_use]
    pub fn shared_with_construction(&self) -> bool {
        self.shared_with_construction
    }

    /// Notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Status as of the last save.
    #[must_use]
    pub fn status(&self) -> BudgetStatus {
        self.status
    }

    /// First publication timestamp.
    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Deselection behavior.
    #[must_use]
    pub fn orphan_policy(&self) -> OrphanPolicy {
        self.orphan_policy
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
