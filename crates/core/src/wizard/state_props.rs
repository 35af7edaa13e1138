//! Property-based tests for the wizard reducer.

use proptest::prelude::*;
use rust_decimal::Decimal;

use dovita_shared::OrphanPolicy;
use dovita_shared::types::{CatalogNodeId, ProjectId};

use super::{WizardEvent, WizardState, WizardStep};
use crate::budget::{BudgetType, LineItem};
use crate::catalog::{CatalogNode, NodeType, ProjectScope};

const MAYOR: CatalogNodeId = CatalogNodeId::from_uuid(uuid::Uuid::from_u128(1));

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000, 0u32..3).prop_map(|(units, scale)| Decimal::new(units, scale))
}

fn arb_item(mayor: CatalogNodeId) -> impl Strategy<Value = LineItem> {
    (arb_amount(), arb_amount(), arb_amount(), arb_amount(), any::<bool>()).prop_map(
        move |(quantity, waste, cost, fee, with_partida)| {
            let mut item = LineItem::new(mayor).with_costs(quantity, waste, cost, fee);
            if with_partida {
                item.partida_id = Some(CatalogNodeId::new());
            }
            item
        },
    )
}

fn arb_step_event() -> impl Strategy<Value = WizardEvent> {
    prop_oneof![Just(WizardEvent::Advance), Just(WizardEvent::Retreat)]
}

/// Parametric session with one selected mayor and `items` under it.
fn session(mayor: CatalogNodeId, items: Vec<LineItem>) -> WizardState {
    let mut state = WizardState::new(BudgetType::Parametric, OrphanPolicy::Keep)
        .apply(WizardEvent::SelectProject(ProjectId::new()))
        .unwrap();
    let node = CatalogNode {
        id: mayor,
        code: "01".to_string(),
        name: "Terracerías".to_string(),
        node_type: NodeType::Mayor,
        parent_id: None,
        project_scope: ProjectScope::Global,
        active: true,
    };
    state = state.apply(WizardEvent::SelectNode(node)).unwrap();
    for item in items {
        state = state.apply(WizardEvent::AddItem(item)).unwrap();
    }
    state
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Step changes never skip a step and never leave the four-step range.
    #[test]
    fn prop_steps_move_one_at_a_time(
        items in prop::collection::vec(arb_item(MAYOR), 0..4),
        events in prop::collection::vec(arb_step_event(), 0..12),
    ) {
        let mut state = session(MAYOR, items);
        for event in events {
            let before = state.step();
            match state.apply(event) {
                Ok(next) => {
                    let distance = i16::from(next.step().number()) - i16::from(before.number());
                    prop_assert!(distance.abs() <= 1);
                    state = next;
                }
                Err(_) => prop_assert!(matches!(before, WizardStep::ItemConfiguration | WizardStep::Preview)),
            }
        }
    }

    /// Reaching the preview step implies the publish gate is open.
    #[test]
    fn prop_preview_implies_publishable(
        items in prop::collection::vec(arb_item(MAYOR), 0..4),
    ) {
        let state = session(MAYOR, items);
        let reached = state
            .apply(WizardEvent::Advance)
            .and_then(|s| s.apply(WizardEvent::Advance))
            .and_then(|s| s.apply(WizardEvent::Advance));
        if let Ok(preview) = reached {
            prop_assert_eq!(preview.step(), WizardStep::Preview);
            prop_assert!(preview.can_publish());
        }
    }

    /// The live summary is exactly the sum of item totals.
    #[test]
    fn prop_summary_matches_items(
        items in prop::collection::vec(arb_item(MAYOR), 0..6),
        tax in any::<bool>(),
    ) {
        let state = session(MAYOR, items)
            .apply(WizardEvent::SetTaxEnabled(tax))
            .unwrap();
        let summary = state.summary();
        let expected: Decimal = state.items().iter().map(|i| i.cost().item_total).sum();
        prop_assert_eq!(summary.subtotal, expected);
        prop_assert_eq!(summary.unassigned, Decimal::ZERO);
        if !tax {
            prop_assert_eq!(summary.total, summary.subtotal);
        }
    }
}
