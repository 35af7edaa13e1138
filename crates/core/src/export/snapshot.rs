//! Builds the export snapshot from a budget and the catalog.

use dovita_shared::types::{CatalogNodeId, Currency, Money};

use super::error::ExportError;
use super::types::{
    ExportAudience, ExportGroup, ExportHeader, ExportItem, ExportSnapshot, ExportTotals,
};
use crate::budget::{Budget, BudgetService, BudgetType, LineItem};
use crate::catalog::CatalogTree;

impl ExportSnapshot {
    /// Groups, computes and labels a budget for rendering.
    ///
    /// Groups follow `group_order`; an empty order falls back to the first
    /// appearance of each group node among the items.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Catalog` if a group node is not in `tree`, or
    /// `ExportError::ClientViewDisabled` for a client export of a budget that
    /// does not allow it.
    pub fn build(
        budget: &Budget,
        tree: &CatalogTree,
        group_order: &[CatalogNodeId],
        audience: ExportAudience,
    ) -> Result<Self, ExportError> {
        if audience == ExportAudience::Client
            && !(budget.budget_type == BudgetType::Executive && budget.client_view_enabled)
        {
            return Err(ExportError::ClientViewDisabled);
        }

        let summary = BudgetService::summarize(budget, group_order);
        let key = budget.budget_type.group_key();
        let mxn = |amount| Money::new(amount, Currency::Mxn);

        let mut groups = Vec::with_capacity(summary.groups.len());
        for group in &summary.groups {
            let node = tree.require(group.node_id)?;
            let items = budget
                .items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.node_key(key) == Some(group.node_id))
                .map(|(index, item)| export_item(index + 1, item, tree, audience))
                .collect();
            groups.push(ExportGroup {
                node_id: node.id,
                code: node.code.clone(),
                name: node.name.clone(),
                items,
                subtotal: mxn(group.subtotal),
            });
        }

        let unassigned = budget
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                item.node_key(key)
                    .is_none_or(|node_id| summary.groups.iter().all(|g| g.node_id != node_id))
            })
            .map(|(index, item)| export_item(index + 1, item, tree, audience))
            .collect();

        Ok(Self {
            header: ExportHeader {
                budget_id: budget.id,
                project_id: budget.project_id,
                budget_type: budget.budget_type,
                status: budget.status,
                version: budget.version,
                published_at: budget.published_at,
                notes: budget.notes.clone(),
                currency: Currency::Mxn,
                audience,
            },
            groups,
            unassigned,
            totals: ExportTotals {
                unassigned: mxn(summary.unassigned),
                subtotal: mxn(summary.subtotal),
                tax: mxn(summary.tax),
                total: mxn(summary.total),
            },
        })
    }
}

fn export_item(
    position: usize,
    item: &LineItem,
    tree: &CatalogTree,
    audience: ExportAudience,
) -> ExportItem {
    let cost = item.cost();
    let code = [item.subpartida_id, item.partida_id, Some(item.mayor_id)]
        .into_iter()
        .flatten()
        .find_map(|id| tree.get(id))
        .map(|node| node.code.clone());
    let internal = audience == ExportAudience::Internal;

    ExportItem {
        position,
        code,
        description: item.description.clone(),
        unit: item.unit.clone(),
        quantity_needed: cost.quantity_needed,
        effective_unit_price: cost.effective_unit_price,
        item_total: cost.item_total,
        quantity_real: internal.then_some(item.quantity_real),
        waste_pct: internal.then_some(item.waste_pct),
        unit_cost: internal.then_some(item.unit_cost),
        fee_pct: internal.then_some(item.fee_pct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::{SampleCatalog, sample_catalog};
    use dovita_shared::types::ProjectId;
    use rust_decimal_macros::dec;

    fn executive_budget() -> (Budget, CatalogTree, SampleCatalog) {
        let catalog = sample_catalog();
        let tree = CatalogTree::build(catalog.nodes.clone()).unwrap();
        let mut budget = Budget::new(ProjectId::new(), BudgetType::Executive);
        budget.tax_enabled = true;
        budget.client_view_enabled = true;
        budget.items = vec![
            tree.line_item_for(catalog.footing)
                .unwrap()
                .with_costs(dec!(10), dec!(10), dec!(100), dec!(15)),
            tree.line_item_for(catalog.excavation_manual)
                .unwrap()
                .with_costs(dec!(5), dec!(0), dec!(100), dec!(0)),
        ];
        (budget, tree, catalog)
    }

    #[test]
    fn test_groups_follow_given_order() {
        let (budget, tree, catalog) = executive_budget();
        let order = [catalog.excavation_manual, catalog.footing];

        let snapshot =
            ExportSnapshot::build(&budget, &tree, &order, ExportAudience::Internal).unwrap();

        let codes: Vec<&str> = snapshot.groups.iter().map(|g| g.code.as_str()).collect();
        assert_eq!(codes, vec!["01.01.01", "02.01.01"]);
        assert_eq!(snapshot.groups[1].items[0].position, 1);
        assert_eq!(snapshot.groups[1].items[0].item_total, dec!(1265));
        assert_eq!(snapshot.totals.subtotal.amount, dec!(1765));
        assert_eq!(snapshot.totals.tax.amount, dec!(282.4));
        assert_eq!(snapshot.totals.total.amount, dec!(2047.4));
        assert!(snapshot.unassigned.is_empty());
    }

    #[test]
    fn test_client_export_hides_cost_breakdown() {
        let (budget, tree, _) = executive_budget();

        let snapshot = ExportSnapshot::build(&budget, &tree, &[], ExportAudience::Client).unwrap();
        let item = &snapshot.groups[0].items[0];
        assert_eq!(item.effective_unit_price, dec!(115));
        assert!(item.unit_cost.is_none());
        assert!(item.waste_pct.is_none());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["groups"][0]["items"][0].get("unit_cost").is_none());
        assert_eq!(json["header"]["audience"], "client");
    }

    #[test]
    fn test_client_export_requires_client_view() {
        let (mut budget, tree, _) = executive_budget();
        budget.client_view_enabled = false;

        assert!(matches!(
            ExportSnapshot::build(&budget, &tree, &[], ExportAudience::Client),
            Err(ExportError::ClientViewDisabled)
        ));
    }

    #[test]
    fn test_unselected_items_exported_as_unassigned() {
        let (budget, tree, catalog) = executive_budget();

        let snapshot =
            ExportSnapshot::build(&budget, &tree, &[catalog.footing], ExportAudience::Internal)
                .unwrap();

        assert_eq!(snapshot.groups.len(), 1);
        assert_eq!(snapshot.unassigned.len(), 1);
        assert_eq!(snapshot.unassigned[0].code.as_deref(), Some("01.01.01"));
        assert_eq!(snapshot.totals.unassigned.amount, dec!(500));
    }

    #[test]
    fn test_unknown_group_node_fails() {
        let (budget, tree, _) = executive_budget();
        let stranger = CatalogNodeId::new();

        assert!(matches!(
            ExportSnapshot::build(&budget, &tree, &[stranger], ExportAudience::Internal),
            Err(ExportError::Catalog(_))
        ));
    }
}
