//! Budget rollups: per-group subtotals, IVA and grand total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dovita_shared::types::{CatalogNodeId, Percentage};

use super::types::LineItem;

/// Mexican IVA rate applied when tax is enabled (16%).
///
/// A fixed national rate; budgets only toggle it on or off.
pub const IVA_RATE: Percentage = Percentage::new(Decimal::from_parts(16, 0, 0, false, 0));

/// Catalog level used to group items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    /// Group by `mayor_id` (parametric budgets).
    Mayor,
    /// Group by `subpartida_id` (executive budgets).
    Subpartida,
}

/// Subtotal of the items under one catalog node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSubtotal {
    /// Group node.
    pub node_id: CatalogNodeId,
    /// Number of items in the group.
    pub item_count: usize,
    /// Sum of item totals.
    pub subtotal: Decimal,
}

/// Rolled-up totals of a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Groups in selection order.
    pub groups: Vec<GroupSubtotal>,
    /// Sum of items whose group node is absent or not selected.
    pub unassigned: Decimal,
    /// Sum of every item total.
    pub subtotal: Decimal,
    /// IVA, exactly zero when tax is disabled.
    pub tax: Decimal,
    /// Subtotal plus tax.
    pub total: Decimal,
}

impl BudgetSummary {
    /// Subtotal of one group, zero if the node is not a group.
    #[must_use]
    pub fn group_subtotal(&self, node_id: CatalogNodeId) -> Decimal {
        self.groups
            .iter()
            .find(|group| group.node_id == node_id)
            .map_or(Decimal::ZERO, |group| group.subtotal)
    }
}

/// IVA due on `subtotal`.
#[must_use]
pub fn tax_for(subtotal: Decimal, tax_enabled: bool) -> Decimal {
    if tax_enabled {
        subtotal.saturating_mul(IVA_RATE.as_fraction())
    } else {
        Decimal::ZERO
    }
}

/// Rolls up `items` into groups ordered as `group_order`.
///
/// Groups appear in the order the nodes were selected, never sorted.
/// Duplicate entries in `group_order` are ignored. An empty item list yields
/// all-zero totals. Sums saturate at `Decimal::MAX` like the calculator does.
#[must_use]
pub fn summarize(
    items: &[LineItem],
    key: GroupKey,
    group_order: &[CatalogNodeId],
    tax_enabled: bool,
) -> BudgetSummary {
    let mut groups: Vec<GroupSubtotal> = Vec::with_capacity(group_order.len());
    for node_id in group_order {
        if groups.iter().all(|group| group.node_id != *node_id) {
            groups.push(GroupSubtotal {
                node_id: *node_id,
                item_count: 0,
                subtotal: Decimal::ZERO,
            });
        }
    }

    let mut unassigned = Decimal::ZERO;
    let mut subtotal = Decimal::ZERO;

    for item in items {
        let item_total = item.cost().item_total;
        subtotal = subtotal.saturating_add(item_total);

        let group = item
            .node_key(key)
            .and_then(|node_id| groups.iter_mut().find(|group| group.node_id == node_id));
        match group {
            Some(group) => {
                group.item_count += 1;
                group.subtotal = group.subtotal.saturating_add(item_total);
            }
            None => unassigned = unassigned.saturating_add(item_total),
        }
    }

    let tax = tax_for(subtotal, tax_enabled);

    BudgetSummary {
        groups,
        unassigned,
        subtotal,
        tax,
        total: subtotal.saturating_add(tax),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(mayor: CatalogNodeId, quantity: Decimal, unit_cost: Decimal) -> LineItem {
        LineItem::new(mayor).with_costs(quantity, Decimal::ZERO, unit_cost, Decimal::ZERO)
    }

    #[test]
    fn test_two_items_with_tax() {
        let mayor = CatalogNodeId::new();
        let items = vec![
            LineItem::new(mayor).with_costs(dec!(10), dec!(10), dec!(100), dec!(15)),
            item(mayor, dec!(5), dec!(100)),
        ];

        let summary = summarize(&items, GroupKey::Mayor, &[mayor], true);

        assert_eq!(summary.subtotal, dec!(1765));
        assert_eq!(summary.tax, dec!(282.4));
        assert_eq!(summary.total, dec!(2047.4));
        assert_eq!(summary.group_subtotal(mayor), dec!(1765));
    }

    #[test]
    fn test_tax_disabled_total_equals_subtotal() {
        let mayor = CatalogNodeId::new();
        let items = vec![item(mayor, dec!(3), dec!(33.33))];

        let summary = summarize(&items, GroupKey::Mayor, &[mayor], false);

        assert!(summary.tax.is_zero());
        assert_eq!(summary.total, summary.subtotal);
    }

    #[test]
    fn test_empty_items_yield_zero() {
        let summary = summarize(&[], GroupKey::Subpartida, &[], true);

        assert!(summary.subtotal.is_zero());
        assert!(summary.tax.is_zero());
        assert!(summary.total.is_zero());
        assert!(summary.groups.is_empty());
    }

    #[test]
    fn test_groups_follow_selection_order() {
        let first = CatalogNodeId::new();
        let second = CatalogNodeId::new();
        let third = CatalogNodeId::new();
        let items = vec![
            item(third, dec!(1), dec!(30)),
            item(first, dec!(1), dec!(10)),
            item(second, dec!(1), dec!(20)),
            item(first, dec!(1), dec!(5)),
        ];

        let summary = summarize(&items, GroupKey::Mayor, &[second, third, first, second], false);

        let order: Vec<CatalogNodeId> = summary.groups.iter().map(|g| g.node_id).collect();
        assert_eq!(order, vec![second, third, first]);
        assert_eq!(summary.groups[2].item_count, 2);
        assert_eq!(summary.groups[2].subtotal, dec!(15));
    }

    #[test]
    fn test_unselected_items_are_unassigned() {
        let selected = CatalogNodeId::new();
        let dropped = CatalogNodeId::new();
        let items = vec![item(selected, dec!(2), dec!(10)), item(dropped, dec!(1), dec!(7))];

        let summary = summarize(&items, GroupKey::Mayor, &[selected], false);

        assert_eq!(summary.group_subtotal(selected), dec!(20));
        assert_eq!(summary.unassigned, dec!(7));
        assert_eq!(summary.subtotal, dec!(27));
    }

    #[test]
    fn test_subpartida_grouping_ignores_items_without_leaf() {
        let sub = CatalogNodeId::new();
        let mut with_leaf = item(CatalogNodeId::new(), dec!(1), dec!(50));
        with_leaf.subpartida_id = Some(sub);
        let without_leaf = item(CatalogNodeId::new(), dec!(1), dec!(8));

        let summary = summarize(&[with_leaf, without_leaf], GroupKey::Subpartida, &[sub], false);

        assert_eq!(summary.group_subtotal(sub), dec!(50));
        assert_eq!(summary.unassigned, dec!(8));
    }

    #[test]
    fn test_saturated_items_do_not_overflow() {
        let mayor = CatalogNodeId::new();
        let huge = Decimal::new(1_000_000_000_000_000, 0);
        let big = item(mayor, huge, huge);
        assert_eq!(big.cost().item_total, Decimal::MAX);

        let summary = summarize(&[big.clone(), big.clone()], GroupKey::Mayor, &[mayor], false);
        assert_eq!(summary.subtotal, Decimal::MAX);
        assert_eq!(summary.group_subtotal(mayor), Decimal::MAX);

        let taxed = summarize(&[big], GroupKey::Mayor, &[], true);
        assert_eq!(taxed.unassigned, Decimal::MAX);
        assert_eq!(taxed.total, Decimal::MAX);
        assert!(taxed.tax > Decimal::ZERO);
    }
}
