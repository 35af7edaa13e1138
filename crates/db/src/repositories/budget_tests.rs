use super::*;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

fn budget_model(id: Uuid, status: &str) -> budgets::Model {
    budget_model_with_selection(id, status, Vec::new())
}

fn budget_model_with_selection(id: Uuid, status: &str, selected_nodes: Vec<Uuid>) -> budgets::Model {
    let created = Utc::now() - chrono::Duration::days(3);
    budgets::Model {
        id,
        project_id: Uuid::now_v7(),
        budget_type: "executive".to_string(),
        tax_enabled: true,
        client_view_enabled: true,
        shared_with_construction: false,
        status: status.to_string(),
        notes: Some("Casa habitación".to_string()),
        version: 2,
        selected_nodes,
        published_at: None,
        created_at: created.into(),
        updated_at: created.into(),
    }
}

fn item_model(budget_id: Uuid, order_index: i32) -> budget_items::Model {
    budget_items::Model {
        id: Uuid::now_v7(),
        budget_id,
        mayor_id: Uuid::now_v7(),
        partida_id: Some(Uuid::now_v7()),
        subpartida_id: Some(Uuid::now_v7()),
        description: "Zapata aislada".to_string(),
        unit: "m3".to_string(),
        quantity_real: dec!(10),
        waste_pct: dec!(10),
        unit_cost: dec!(100),
        fee_pct: dec!(15),
        supplier_alias: Some("CEMEX".to_string()),
        order_index,
        created_at: Utc::now().into(),
    }
}

fn new_budget(item_count: usize) -> Budget {
    let mut budget = Budget::new(ProjectId::new(), BudgetType::Parametric);
    let mayor = CatalogNodeId::new();
    budget.items = (0..item_count)
        .map(|_| LineItem::new(mayor).with_costs(dec!(2), dec!(5), dec!(40), dec!(10)))
        .collect();
    budget
}

#[tokio::test]
async fn test_find_maps_budget_and_items() {
    let id = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![budget_model(id, "draft")]])
        .append_query_results([vec![item_model(id, 0), item_model(id, 1)]])
        .into_connection();
    let repo = BudgetRepository::new(db);

    let budget = repo.find(BudgetId::from_uuid(id)).await.unwrap();

    assert_eq!(budget.id, Some(BudgetId::from_uuid(id)));
    assert_eq!(budget.budget_type, BudgetType::Executive);
    assert_eq!(budget.status, BudgetStatus::Draft);
    assert_eq!(budget.items.len(), 2);
    assert_eq!(budget.items[1].order_index, 1);
    assert_eq!(budget.items[0].cost().item_total, dec!(1265));
}

#[tokio::test]
async fn test_find_keeps_stored_selection_order() {
    let id = Uuid::now_v7();
    let items = vec![item_model(id, 0), item_model(id, 1)];
    let unused = Uuid::now_v7();
    let selection = vec![items[1].subpartida_id.unwrap(), unused, items[0].subpartida_id.unwrap()];
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![budget_model_with_selection(id, "draft", selection.clone())]])
        .append_query_results([items])
        .into_connection();
    let repo = BudgetRepository::new(db);

    let budget = repo.find(BudgetId::from_uuid(id)).await.unwrap();

    let order: Vec<Uuid> = budget
        .selection_order()
        .into_iter()
        .map(CatalogNodeId::into_inner)
        .collect();
    assert_eq!(order, selection);
}

#[tokio::test]
async fn test_find_unknown_budget() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<budgets::Model>::new()])
        .into_connection();
    let repo = BudgetRepository::new(db);

    let err = repo.load_budget(BudgetId::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "budget", .. }));
}

#[tokio::test]
async fn test_find_rejects_unknown_status() {
    let id = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![budget_model(id, "archived")]])
        .append_query_results([Vec::<budget_items::Model>::new()])
        .into_connection();
    let repo = BudgetRepository::new(db);

    assert!(matches!(
        repo.find(BudgetId::from_uuid(id)).await,
        Err(DbError::InvalidEnum { column: "status", .. })
    ));
}

#[tokio::test]
async fn test_save_new_budget_assigns_ids() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec(1), exec(0), exec(3)])
        .into_connection();
    let repo = BudgetRepository::new(db);

    let stored = repo.save(&new_budget(3)).await.unwrap();

    assert!(stored.id.is_some());
    assert!(stored.created_at.is_some());
    assert_eq!(stored.created_at, stored.updated_at);
    let order: Vec<i32> = stored.items.iter().map(|i| i.order_index).collect();
    assert_eq!(order, vec![0, 1, 2]);
    assert!(stored.items.iter().all(|i| i.id.is_some()));
}

#[tokio::test]
async fn test_save_existing_budget_keeps_created_at() {
    let id = Uuid::now_v7();
    let existing = budget_model(id, "draft");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing.clone()]])
        .append_exec_results([exec(1), exec(4), exec(1)])
        .into_connection();
    let repo = BudgetRepository::new(db);

    let mut budget = new_budget(1);
    budget.id = Some(BudgetId::from_uuid(id));
    let stored = repo.save(&budget).await.unwrap();

    assert_eq!(stored.id, budget.id);
    assert_eq!(
        stored.created_at,
        Some(existing.created_at.with_timezone(&Utc))
    );
    assert!(stored.updated_at > stored.created_at);
}

#[tokio::test]
async fn test_save_without_items_skips_insert() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec(1), exec(0)])
        .into_connection();
    let repo = BudgetRepository::new(db);

    let stored = repo.save(&new_budget(0)).await.unwrap();
    assert!(stored.items.is_empty());
}

#[tokio::test]
async fn test_failed_item_insert_surfaces_as_backend_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec(1), exec(2)])
        .append_exec_errors([DbErr::Custom("violates check constraint".to_string())])
        .into_connection();
    let repo = BudgetRepository::new(db);

    let err = repo.save_budget(&new_budget(2)).await.unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)));
}

#[tokio::test]
async fn test_update_of_missing_budget_fails() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<budgets::Model>::new()])
        .into_connection();
    let repo = BudgetRepository::new(db);

    let mut budget = new_budget(1);
    budget.id = Some(BudgetId::new());
    assert!(matches!(
        repo.save(&budget).await,
        Err(DbError::NotFound { entity: "budget", .. })
    ));
}
