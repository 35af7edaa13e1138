//! Budget data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use dovita_shared::types::{BudgetId, CatalogNodeId, LineItemId, ProjectId};

use super::aggregator::GroupKey;
use super::calculator::{self, ItemCost};
use crate::catalog::NodeType;

/// Budget variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetType {
    /// Built from mayor + partida selections with a flat cost model.
    Parametric,
    /// Built from subpartida-level detail.
    Executive,
}

impl BudgetType {
    /// Returns the string representation of the budget type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parametric => "parametric",
            Self::Executive => "executive",
        }
    }

    /// Parses a budget type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "parametric" | "parametrico" => Some(Self::Parametric),
            "executive" | "ejecutivo" => Some(Self::Executive),
            _ => None,
        }
    }

    /// Catalog level the user selects in the node selection step.
    #[must_use]
    pub const fn selection_node_type(&self) -> NodeType {
        match self {
            Self::Parametric => NodeType::Mayor,
            Self::Executive => NodeType::Subpartida,
        }
    }

    /// Grouping used for subtotals in previews and exports.
    #[must_use]
    pub const fn group_key(&self) -> GroupKey {
        match self {
            Self::Parametric => GroupKey::Mayor,
            Self::Executive => GroupKey::Subpartida,
        }
    }
}

impl fmt::Display for BudgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Budget publication status.
///
/// Both states can be saved again; publishing only stamps `published_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// Work in progress.
    #[default]
    Draft,
    /// Visible to the rest of the organization.
    Published,
}

impl BudgetStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" | "borrador" => Some(Self::Draft),
            "published" | "publicado" => Some(Self::Published),
            _ => None,
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A costed line of a budget.
///
/// Numeric fields default to zero when missing from the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Persisted ID, `None` until the budget is saved.
    #[serde(default)]
    pub id: Option<LineItemId>,
    /// Mayor the item belongs to.
    pub mayor_id: CatalogNodeId,
    /// Partida under the mayor.
    #[serde(default)]
    pub partida_id: Option<CatalogNodeId>,
    /// Subpartida leaf, executive budgets only.
    #[serde(default)]
    pub subpartida_id: Option<CatalogNodeId>,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Unit of measure (m3, kg, pza...).
    #[serde(default)]
    pub unit: String,
    /// Quantity actually required by the work.
    #[serde(default)]
    pub quantity_real: Decimal,
    /// Waste allowance in percent.
    #[serde(default)]
    pub waste_pct: Decimal,
    /// Supplier unit cost.
    #[serde(default)]
    pub unit_cost: Decimal,
    /// Fee (honorarios) in percent.
    #[serde(default)]
    pub fee_pct: Decimal,
    /// Supplier shorthand, recorded in price history.
    #[serde(default)]
    pub supplier_alias: Option<String>,
    /// Position in the budget, renumbered on every save.
    #[serde(default)]
    pub order_index: i32,
}

impl LineItem {
    /// Creates an empty item under a mayor.
    #[must_use]
    pub fn new(mayor_id: CatalogNodeId) -> Self {
        Self {
            id: None,
            mayor_id,
            partida_id: None,
            subpartida_id: None,
            description: String::new(),
            unit: String::new(),
            quantity_real: Decimal::ZERO,
            waste_pct: Decimal::ZERO,
            unit_cost: Decimal::ZERO,
            fee_pct: Decimal::ZERO,
            supplier_alias: None,
            order_index: 0,
        }
    }

    /// Sets the four cost inputs.
    #[must_use]
    pub fn with_costs(
        mut self,
        quantity_real: Decimal,
        waste_pct: Decimal,
        unit_cost: Decimal,
        fee_pct: Decimal,
    ) -> Self {
        self.quantity_real = quantity_real;
        self.waste_pct = waste_pct;
        self.unit_cost = unit_cost;
        self.fee_pct = fee_pct;
        self
    }

    /// Derived quantities and totals for this item.
    #[must_use]
    pub fn cost(&self) -> ItemCost {
        calculator::compute(
            self.quantity_real,
            self.waste_pct,
            self.unit_cost,
            self.fee_pct,
        )
    }

    /// The catalog node this item is grouped under.
    #[must_use]
    pub fn node_key(&self, key: GroupKey) -> Option<CatalogNodeId> {
        match key {
            GroupKey::Mayor => Some(self.mayor_id),
            GroupKey::Subpartida => self.subpartida_id,
        }
    }

    /// The catalog leaf the budget variant requires on every item.
    #[must_use]
    pub fn required_leaf(&self, budget_type: BudgetType) -> Option<CatalogNodeId> {
        match budget_type {
            BudgetType::Parametric => self.partida_id,
            BudgetType::Executive => self.subpartida_id,
        }
    }
}

/// A parametric or executive budget with its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID, `None` until first saved.
    pub id: Option<BudgetId>,
    /// Owning project.
    pub project_id: ProjectId,
    /// Budget variant.
    pub budget_type: BudgetType,
    /// Whether IVA is added to the subtotal.
    pub tax_enabled: bool,
    /// Client portal visibility (executive only).
    pub client_view_enabled: bool,
    /// Shared with the construction team (executive only).
    pub shared_with_construction: bool,
    /// Publication status.
    pub status: BudgetStatus,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Budget version number.
    pub version: i32,
    /// First publication timestamp.
    pub published_at: Option<DateTime<Utc>>,
    /// Creation timestamp, set by the store.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp, set by the store.
    pub updated_at: Option<DateTime<Utc>>,
    /// Catalog nodes picked in the wizard, in selection order.
    #[serde(default)]
    pub selected_nodes: Vec<CatalogNodeId>,
    /// Ordered line items.
    pub items: Vec<LineItem>,
}

impl Budget {
    /// Creates an empty draft for a project.
    #[must_use]
    pub fn new(project_id: ProjectId, budget_type: BudgetType) -> Self {
        Self {
            id: None,
            project_id,
            budget_type,
            tax_enabled: false,
            client_view_enabled: false,
            shared_with_construction: false,
            status: BudgetStatus::Draft,
            notes: None,
            version: 1,
            published_at: None,
            created_at: None,
            updated_at: None,
            selected_nodes: Vec::new(),
            items: Vec::new(),
        }
    }

    /// The stored wizard selection, or the group nodes in order of first
    /// appearance among the items when nothing was stored.
    ///
    /// Used as the selection order when no wizard session is available,
    /// e.g. when exporting or resuming a stored budget.
    #[must_use]
    pub fn selection_order(&self) -> Vec<CatalogNodeId> {
        if !self.selected_nodes.is_empty() {
            return self.selected_nodes.clone();
        }
        let key = self.budget_type.group_key();
        let mut order: Vec<CatalogNodeId> = Vec::new();
        for node in self.items.iter().filter_map(|item| item.node_key(key)) {
            if !order.contains(&node) {
                order.push(node);
            }
        }
        order
    }
}
