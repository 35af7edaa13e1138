//! Export data types handed to PDF and Excel renderers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use dovita_shared::types::{BudgetId, CatalogNodeId, Currency, Money, ProjectId};

use crate::budget::{BudgetStatus, BudgetType};

/// Who the export is for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportAudience {
    /// Full cost breakdown for the office.
    #[default]
    Internal,
    /// Client portal: prices include fees, no supplier cost or waste.
    Client,
}

/// Budget header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportHeader {
    /// Budget ID, `None` for an unsaved preview.
    pub budget_id: Option<BudgetId>,
    /// Owning project.
    pub project_id: ProjectId,
    /// Budget variant.
    pub budget_type: BudgetType,
    /// Publication status.
    pub status: BudgetStatus,
    /// Version number.
    pub version: i32,
    /// First publication timestamp.
    pub published_at: Option<DateTime<Utc>>,
    /// Notes.
    pub notes: Option<String>,
    /// Currency of every amount.
    pub currency: Currency,
    /// Intended audience.
    pub audience: ExportAudience,
}

/// One exported line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportItem {
    /// One-based position in the budget.
    pub position: usize,
    /// Catalog code of the most specific node the item references.
    pub code: Option<String>,
    /// Description.
    pub description: String,
    /// Unit of measure.
    pub unit: String,
    /// Quantity including waste.
    pub quantity_needed: Decimal,
    /// Unit price including fee.
    pub effective_unit_price: Decimal,
    /// Line total.
    pub item_total: Decimal,
    /// Quantity before waste. Internal only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_real: Option<Decimal>,
    /// Waste percent. Internal only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste_pct: Option<Decimal>,
    /// Supplier unit cost. Internal only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<Decimal>,
    /// Fee percent. Internal only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_pct: Option<Decimal>,
}

/// Items under one group node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportGroup {
    /// Group node.
    pub node_id: CatalogNodeId,
    /// Catalog code.
    pub code: String,
    /// Catalog name.
    pub name: String,
    /// Items in budget order.
    pub items: Vec<ExportItem>,
    /// Group subtotal.
    pub subtotal: Money,
}

/// Budget totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTotals {
    /// Sum of items outside any group.
    pub unassigned: Money,
    /// Sum of every item.
    pub subtotal: Money,
    /// IVA.
    pub tax: Money,
    /// Grand total.
    pub total: Money,
}

/// Everything a renderer needs, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSnapshot {
    /// Budget header.
    pub header: ExportHeader,
    /// Groups in selection order.
    pub groups: Vec<ExportGroup>,
    /// Items whose group node is absent or not selected.
    pub unassigned: Vec<ExportItem>,
    /// Totals.
    pub totals: ExportTotals,
}
