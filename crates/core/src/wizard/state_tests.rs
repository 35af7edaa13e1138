use super::*;
use crate::budget::ItemDefect;
use crate::catalog::{CatalogTree, NodeType};
use crate::catalog::test_support::{SampleCatalog, sample_catalog};
use dovita_shared::types::CatalogNodeId;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct Fixture {
    catalog: SampleCatalog,
    tree: CatalogTree,
}

fn fixture() -> Fixture {
    let catalog = sample_catalog();
    let tree = CatalogTree::build(catalog.nodes.clone()).unwrap();
    Fixture { catalog, tree }
}

impl Fixture {
    fn select(&self, id: CatalogNodeId) -> WizardEvent {
        WizardEvent::SelectNode(self.tree.get(id).cloned().unwrap())
    }

    fn priced_item(&self, id: CatalogNodeId, unit_cost: Decimal) -> LineItem {
        let mut item = self
            .tree
            .line_item_for(id)
            .unwrap()
            .with_costs(dec!(10), dec!(10), unit_cost, dec!(15));
        item.unit = "m3".to_string();
        item
    }
}

fn run(state: WizardState, events: Vec<WizardEvent>) -> Result<WizardState, WizardError> {
    events
        .into_iter()
        .try_fold(state, |state, event| state.apply(event))
}

/// Parametric session on `ItemConfiguration` with one partida-level item.
fn parametric_at_items(fx: &Fixture, unit_cost: Decimal) -> WizardState {
    run(
        WizardState::new(BudgetType::Parametric, OrphanPolicy::Keep),
        vec![
            WizardEvent::SelectProject(ProjectId::new()),
            WizardEvent::Advance,
            fx.select(fx.catalog.earthworks),
            WizardEvent::Advance,
            WizardEvent::AddItem(fx.priced_item(fx.catalog.excavation, unit_cost)),
        ],
    )
    .unwrap()
}

#[test]
fn test_project_info_requires_project() {
    let err = WizardState::new(BudgetType::Parametric, OrphanPolicy::Keep)
        .apply(WizardEvent::Advance)
        .unwrap_err();
    match err {
        WizardError::Blocked { step, issues } => {
            assert_eq!(step, WizardStep::ProjectInfo);
            assert_eq!(issues, vec![ValidationIssue::ProjectNotSelected]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_node_selection_requires_a_node() {
    let state = run(
        WizardState::new(BudgetType::Executive, OrphanPolicy::Keep),
        vec![WizardEvent::SelectProject(ProjectId::new()), WizardEvent::Advance],
    )
    .unwrap();
    assert_eq!(state.step(), WizardStep::NodeSelection);
    assert!(!state.can_advance());

    let err = state.apply(WizardEvent::Advance).unwrap_err();
    assert!(matches!(err, WizardError::Blocked { step: WizardStep::NodeSelection, .. }));
    assert_eq!(
        err.to_string(),
        "Cannot leave node selection: Select at least one subpartida"
    );
}

#[test]
fn test_zero_unit_cost_blocks_then_unblocks() {
    let fx = fixture();
    let state = parametric_at_items(&fx, Decimal::ZERO);
    assert_eq!(state.step(), WizardStep::ItemConfiguration);
    assert!(!state.can_advance());

    let blocked = state.apply(WizardEvent::Advance).unwrap_err();
    match blocked {
        WizardError::Blocked { issues, .. } => assert_eq!(
            issues,
            vec![ValidationIssue::IncompleteItem {
                position: 1,
                defect: ItemDefect::NonPositiveUnitCost,
                budget_type: BudgetType::Parametric,
            }]
        ),
        other => panic!("unexpected error: {other}"),
    }

    let mut fixed = state.items()[0].clone();
    fixed.unit_cost = dec!(1);
    let state = state
        .apply(WizardEvent::UpdateItem { index: 0, item: fixed })
        .unwrap()
        .apply(WizardEvent::Advance)
        .unwrap();
    assert_eq!(state.step(), WizardStep::Preview);
    assert!(state.can_publish());
}

#[test]
fn test_deselecting_only_node_keeps_items_but_blocks_publish() {
    let fx = fixture();
    let state = parametric_at_items(&fx, dec!(100))
        .apply(WizardEvent::Advance)
        .unwrap();
    assert!(state.can_publish());

    let state = state
        .apply(WizardEvent::DeselectNode(fx.catalog.earthworks))
        .unwrap();

    assert_eq!(state.items().len(), 1);
    assert!(state.has_validation_errors());
    assert!(!state.can_publish());
    let issues = state.validation_issues();
    assert!(issues.contains(&ValidationIssue::NoNodesSelected {
        node_type: NodeType::Mayor
    }));
    assert!(issues.contains(&ValidationIssue::OrphanedItem {
        position: 1,
        node_id: fx.catalog.earthworks,
    }));
}

#[test]
fn test_remove_policy_drops_orphaned_items() {
    let fx = fixture();
    let state = run(
        WizardState::new(BudgetType::Parametric, OrphanPolicy::Remove),
        vec![
            fx.select(fx.catalog.earthworks),
            fx.select(fx.catalog.structure),
            WizardEvent::AddItem(fx.priced_item(fx.catalog.excavation, dec!(100))),
            WizardEvent::AddItem(fx.priced_item(fx.catalog.foundations, dec!(50))),
            WizardEvent::DeselectNode(fx.catalog.earthworks),
        ],
    )
    .unwrap();

    assert_eq!(state.items().len(), 1);
    assert_eq!(state.items()[0].mayor_id, fx.catalog.structure);
    assert_eq!(state.selection().as_slice(), &[fx.catalog.structure]);
}

#[test]
fn test_select_node_checks_level() {
    let fx = fixture();
    let err = WizardState::new(BudgetType::Executive, OrphanPolicy::Keep)
        .apply(fx.select(fx.catalog.earthworks))
        .unwrap_err();
    assert!(matches!(
        err,
        WizardError::WrongNodeType {
            expected: NodeType::Subpartida,
            actual: NodeType::Mayor,
            ..
        }
    ));

    let state = WizardState::new(BudgetType::Executive, OrphanPolicy::Keep)
        .apply(fx.select(fx.catalog.footing))
        .unwrap()
        .apply(fx.select(fx.catalog.footing))
        .unwrap();
    assert_eq!(state.selection().len(), 1);
}

#[test]
fn test_deselect_unknown_node() {
    let err = WizardState::new(BudgetType::Parametric, OrphanPolicy::Keep)
        .apply(WizardEvent::DeselectNode(CatalogNodeId::new()))
        .unwrap_err();
    assert!(matches!(err, WizardError::NodeNotSelected(_)));
}

#[test]
fn test_item_index_bounds() {
    let fx = fixture();
    let state = parametric_at_items(&fx, dec!(100));

    assert!(matches!(
        state.apply(WizardEvent::RemoveItem(1)),
        Err(WizardError::ItemOutOfRange { index: 1, len: 1 })
    ));
    assert!(matches!(
        state.apply(WizardEvent::MoveItem { from: 0, to: 3 }),
        Err(WizardError::ItemOutOfRange { index: 3, len: 1 })
    ));
}

#[test]
fn test_move_item_reorders() {
    let fx = fixture();
    let first = fx.priced_item(fx.catalog.excavation, dec!(1));
    let second = fx.priced_item(fx.catalog.foundations, dec!(2));
    let third = fx.priced_item(fx.catalog.foundations, dec!(3));

    let state = run(
        WizardState::new(BudgetType::Parametric, OrphanPolicy::Keep),
        vec![
            WizardEvent::AddItem(first),
            WizardEvent::AddItem(second),
            WizardEvent::AddItem(third),
            WizardEvent::MoveItem { from: 2, to: 0 },
        ],
    )
    .unwrap();

    let costs: Vec<Decimal> = state.items().iter().map(|i| i.unit_cost).collect();
    assert_eq!(costs, vec![dec!(3), dec!(1), dec!(2)]);
}

#[test]
fn test_executive_flags_rejected_on_parametric() {
    let state = WizardState::new(BudgetType::Parametric, OrphanPolicy::Keep);
    assert!(matches!(
        state.apply(WizardEvent::SetClientView(true)),
        Err(WizardError::ExecutiveOnlyFlag("client_view_enabled"))
    ));
    assert!(state.apply(WizardEvent::SetClientView(false)).is_ok());
    assert!(matches!(
        state.apply(WizardEvent::SetSharedWithConstruction(true)),
        Err(WizardError::ExecutiveOnlyFlag("shared_with_construction"))
    ));

    let executive = WizardState::new(BudgetType::Executive, OrphanPolicy::Keep)
        .apply(WizardEvent::SetClientView(true))
        .unwrap();
    assert!(executive.client_view_enabled());
}

#[test]
fn test_retreat_always_allowed_down_to_first_step() {
    let fx = fixture();
    let state = parametric_at_items(&fx, Decimal::ZERO);

    let state = run(
        state,
        vec![WizardEvent::Retreat, WizardEvent::Retreat, WizardEvent::Retreat],
    )
    .unwrap();
    assert_eq!(state.step(), WizardStep::ProjectInfo);
}

#[test]
fn test_preview_is_terminal() {
    let fx = fixture();
    let state = parametric_at_items(&fx, dec!(100))
        .apply(WizardEvent::Advance)
        .unwrap();
    assert!(!state.can_advance());
    assert!(matches!(
        state.apply(WizardEvent::Advance),
        Err(WizardError::TerminalStep)
    ));
}

#[test]
fn test_summary_matches_reference_item() {
    let fx = fixture();
    let state = parametric_at_items(&fx, dec!(100))
        .apply(WizardEvent::SetTaxEnabled(true))
        .unwrap();

    let summary = state.summary();
    assert_eq!(summary.subtotal, dec!(1265));
    assert_eq!(summary.group_subtotal(fx.catalog.earthworks), dec!(1265));
    assert_eq!(summary.tax, dec!(202.4));
    assert_eq!(summary.total, dec!(1467.4));
}

#[test]
fn test_blank_notes_are_cleared() {
    let state = WizardState::new(BudgetType::Parametric, OrphanPolicy::Keep)
        .apply(WizardEvent::SetNotes(Some("   ".to_string())))
        .unwrap();
    assert_eq!(state.notes(), None);

    let state = state
        .apply(WizardEvent::SetNotes(Some("Incluye acarreos".to_string())))
        .unwrap();
    assert_eq!(state.notes(), Some("Incluye acarreos"));
}

#[test]
fn test_to_budget_requires_project() {
    let state = WizardState::new(BudgetType::Executive, OrphanPolicy::Keep);
    assert!(matches!(
        state.to_budget(),
        Err(WizardError::ProjectNotSelected)
    ));
}

#[test]
fn test_resume_round_trips_through_budget() {
    let fx = fixture();
    let state = run(
        WizardState::new(BudgetType::Executive, OrphanPolicy::Keep),
        vec![
            WizardEvent::SelectProject(ProjectId::new()),
            fx.select(fx.catalog.footing),
            fx.select(fx.catalog.excavation_machine),
            fx.select(fx.catalog.excavation_manual),
            WizardEvent::AddItem(fx.priced_item(fx.catalog.excavation_manual, dec!(80))),
            WizardEvent::AddItem(fx.priced_item(fx.catalog.footing, dec!(1200))),
            WizardEvent::SetClientView(true),
        ],
    )
    .unwrap();

    let budget = state.to_budget().unwrap();
    let resumed = WizardState::resume(budget.clone(), OrphanPolicy::Keep);

    assert_eq!(resumed.step(), WizardStep::ProjectInfo);
    assert_eq!(
        resumed.selection().as_slice(),
        &[
            fx.catalog.footing,
            fx.catalog.excavation_machine,
            fx.catalog.excavation_manual
        ]
    );
    let groups: Vec<CatalogNodeId> = resumed.summary().groups.iter().map(|g| g.node_id).collect();
    assert_eq!(groups, state.selection().as_slice());
    assert_eq!(resumed.items(), budget.items.as_slice());
    assert!(resumed.client_view_enabled());
    assert_eq!(resumed.to_budget().unwrap(), budget);
}

#[test]
fn test_mark_saved_takes_store_fields() {
    let fx = fixture();
    let state = parametric_at_items(&fx, dec!(100));

    let mut saved = state.to_budget().unwrap();
    saved.id = Some(BudgetId::new());
    saved.status = BudgetStatus::Published;
    saved.published_at = Some(Utc::now());
    saved.items[0].order_index = 0;

    let state = state.mark_saved(&saved);
    assert_eq!(state.budget_id(), saved.id);
    assert_eq!(state.status(), BudgetStatus::Published);
    assert_eq!(state.published_at(), saved.published_at);
    assert_eq!(state.step(), WizardStep::ItemConfiguration);
}

#[test]
fn test_rejected_events_leave_session_intact() {
    let fx = fixture();
    let state = parametric_at_items(&fx, Decimal::ZERO);
    let before = state.clone();

    assert!(state.apply(WizardEvent::Advance).is_err());
    assert!(state.apply(WizardEvent::RemoveItem(5)).is_err());
    assert!(state.apply(WizardEvent::SetClientView(true)).is_err());
    assert!(
        state
            .apply(WizardEvent::DeselectNode(CatalogNodeId::new()))
            .is_err()
    );

    assert_eq!(state, before);
    assert_eq!(state.step(), WizardStep::ItemConfiguration);
    assert_eq!(state.items().len(), 1);
    assert!(state.selection().contains(fx.catalog.earthworks));

    let mut fixed = state.items()[0].clone();
    fixed.unit_cost = dec!(1);
    let state = state
        .apply(WizardEvent::UpdateItem { index: 0, item: fixed })
        .unwrap()
        .advance()
        .unwrap();
    assert_eq!(state.step(), WizardStep::Preview);
}
