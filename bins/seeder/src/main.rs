//! Database seeder for Dovita development.
//!
//! Seeds a small construction catalog with fixed IDs and, on the first run,
//! one published parametric budget and one executive draft for a demo
//! project. Budgets go through the wizard and `BudgetSaver` so they pass the
//! same validation as user-built ones.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;
use uuid::Uuid;

use dovita_core::budget::{BudgetType, LineItem};
use dovita_core::catalog::{CatalogNode, NodeType, ProjectScope};
use dovita_core::store::BudgetSaver;
use dovita_core::wizard::{WizardEvent, WizardState};
use dovita_db::{BudgetRepository, CatalogRepository, PriceHistoryRepository};
use dovita_shared::types::{CatalogNodeId, ProjectId};
use dovita_shared::{AppConfig, telemetry};

/// Demo project every seeded budget belongs to.
const DEMO_PROJECT: ProjectId = ProjectId::from_uuid(Uuid::from_u128(0x0100));

const DEPARTMENT: CatalogNodeId = node_id(0x1000);
const EARTHWORKS: CatalogNodeId = node_id(0x1100);
const EXCAVATION: CatalogNodeId = node_id(0x1110);
const EXCAVATION_MANUAL: CatalogNodeId = node_id(0x1111);
const EXCAVATION_MACHINE: CatalogNodeId = node_id(0x1112);
const STRUCTURE: CatalogNodeId = node_id(0x1200);
const FOUNDATIONS: CatalogNodeId = node_id(0x1210);
const FOOTING: CatalogNodeId = node_id(0x1211);
const CONCRETE: CatalogNodeId = node_id(0x1220);
const SLAB: CatalogNodeId = node_id(0x1221);

const fn node_id(value: u128) -> CatalogNodeId {
    CatalogNodeId::from_uuid(Uuid::from_u128(value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.logging).context("Failed to initialize tracing")?;

    let db = dovita_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    let catalog = CatalogRepository::new(db.clone());
    let seeded = catalog.upsert_nodes(&demo_catalog()).await?;
    info!(nodes = seeded, "Seeded catalog");

    let budgets = BudgetRepository::new(db.clone());
    if !budgets.list_for_project(DEMO_PROJECT).await?.is_empty() {
        info!(project_id = %DEMO_PROJECT, "Demo budgets already exist, skipping");
        return Ok(());
    }

    let saver = BudgetSaver::new(
        Arc::new(budgets),
        Arc::new(PriceHistoryRepository::new(db)),
        &config.budget,
    );

    let parametric = parametric_session(&config)?;
    let outcome = saver.save(&parametric, true).await?;
    info!(
        budget_id = %outcome.budget_id,
        status = %outcome.status,
        total = %parametric.summary().total,
        "Seeded parametric budget"
    );

    let executive = executive_session(&config)?;
    let outcome = saver.save(&executive, false).await?;
    info!(
        budget_id = %outcome.budget_id,
        status = %outcome.status,
        prices_recorded = outcome.price_history.recorded,
        "Seeded executive budget"
    );

    Ok(())
}

fn demo_catalog() -> Vec<CatalogNode> {
    let global = |id, node_type, code: &str, name: &str, parent_id| CatalogNode {
        id,
        code: code.to_string(),
        name: name.to_string(),
        node_type,
        parent_id,
        project_scope: ProjectScope::Global,
        active: true,
    };

    vec![
        global(DEPARTMENT, NodeType::Department, "A", "Construcción", None),
        global(EARTHWORKS, NodeType::Mayor, "01", "Terracerías", Some(DEPARTMENT)),
        global(EXCAVATION, NodeType::Partida, "01.01", "Excavación", Some(EARTHWORKS)),
        global(
            EXCAVATION_MANUAL,
            NodeType::Subpartida,
            "01.01.01",
            "Excavación a mano",
            Some(EXCAVATION),
        ),
        global(
            EXCAVATION_MACHINE,
            NodeType::Subpartida,
            "01.01.02",
            "Excavación con máquina",
            Some(EXCAVATION),
        ),
        global(STRUCTURE, NodeType::Mayor, "02", "Estructura", Some(DEPARTMENT)),
        global(FOUNDATIONS, NodeType::Partida, "02.01", "Cimentación", Some(STRUCTURE)),
        global(FOOTING, NodeType::Subpartida, "02.01.01", "Zapata aislada", Some(FOUNDATIONS)),
        global(CONCRETE, NodeType::Partida, "02.02", "Concreto", Some(STRUCTURE)),
        global(SLAB, NodeType::Subpartida, "02.02.01", "Losa de azotea", Some(CONCRETE)),
    ]
}

#[allow(clippy::too_many_arguments)]
fn item(
    mayor: CatalogNodeId,
    partida: CatalogNodeId,
    subpartida: Option<CatalogNodeId>,
    description: &str,
    unit: &str,
    quantity_real: Decimal,
    unit_cost: Decimal,
    supplier: Option<&str>,
) -> LineItem {
    let mut item = LineItem::new(mayor).with_costs(quantity_real, dec!(5), unit_cost, dec!(12));
    item.partida_id = Some(partida);
    item.subpartida_id = subpartida;
    item.description = description.to_string();
    item.unit = unit.to_string();
    item.supplier_alias = supplier.map(str::to_string);
    item
}

fn catalog_node(id: CatalogNodeId, node_type: NodeType) -> CatalogNode {
    CatalogNode {
        id,
        code: String::new(),
        name: String::new(),
        node_type,
        parent_id: None,
        project_scope: ProjectScope::Global,
        active: true,
    }
}

fn parametric_session(config: &AppConfig) -> anyhow::Result<WizardState> {
    let events = [
        WizardEvent::SelectProject(DEMO_PROJECT),
        WizardEvent::SetTaxEnabled(true),
        WizardEvent::SetNotes(Some("Presupuesto paramétrico de arranque".to_string())),
        WizardEvent::Advance,
        WizardEvent::SelectNode(catalog_node(EARTHWORKS, NodeType::Mayor)),
        WizardEvent::SelectNode(catalog_node(STRUCTURE, NodeType::Mayor)),
        WizardEvent::Advance,
        WizardEvent::AddItem(item(
            EARTHWORKS,
            EXCAVATION,
            None,
            "Excavación general",
            "m3",
            dec!(120),
            dec!(185.50),
            None,
        )),
        WizardEvent::AddItem(item(
            STRUCTURE,
            FOUNDATIONS,
            None,
            "Zapatas de concreto armado",
            "m3",
            dec!(18),
            dec!(4350),
            None,
        )),
        WizardEvent::Advance,
    ];

    run(WizardState::new(BudgetType::Parametric, config.budget.orphan_policy), events)
}

fn executive_session(config: &AppConfig) -> anyhow::Result<WizardState> {
    let events = [
        WizardEvent::SelectProject(DEMO_PROJECT),
        WizardEvent::SetClientView(true),
        WizardEvent::Advance,
        WizardEvent::SelectNode(catalog_node(EXCAVATION_MACHINE, NodeType::Subpartida)),
        WizardEvent::SelectNode(catalog_node(SLAB, NodeType::Subpartida)),
        WizardEvent::Advance,
        WizardEvent::AddItem(item(
            EARTHWORKS,
            EXCAVATION,
            Some(EXCAVATION_MACHINE),
            "Excavación con retroexcavadora",
            "m3",
            dec!(95),
            dec!(142.80),
            Some("MAQ-NTE"),
        )),
        WizardEvent::AddItem(item(
            STRUCTURE,
            CONCRETE,
            Some(SLAB),
            "Losa maciza de 10 cm",
            "m2",
            dec!(64),
            dec!(890),
            Some("CONC-GDL"),
        )),
    ];

    run(WizardState::new(BudgetType::Executive, config.budget.orphan_policy), events)
}

fn run(
    mut state: WizardState,
    events: impl IntoIterator<Item = WizardEvent>,
) -> anyhow::Result<WizardState> {
    for event in events {
        state = state.apply(event)?;
    }
    Ok(state)
}
