//! Budgeting schema.
//!
//! Creates the catalog, budget, budget item and price history tables. Enum
//! columns are TEXT guarded by CHECK constraints so they map one to one to
//! the `as_str` forms of the domain enums.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(CATALOG_NODES_SQL).await?;
        db.execute_unprepared(BUDGETS_SQL).await?;
        db.execute_unprepared(BUDGET_ITEMS_SQL).await?;
        db.execute_unprepared(PRICE_HISTORY_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const CATALOG_NODES_SQL: &str = r"
CREATE TABLE catalog_nodes (
    id UUID PRIMARY KEY,
    code VARCHAR(32) NOT NULL,
    name VARCHAR(255) NOT NULL,
    node_type TEXT NOT NULL,
    parent_id UUID REFERENCES catalog_nodes(id) ON DELETE RESTRICT,
    project_scope TEXT NOT NULL DEFAULT 'global',
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_node_type CHECK (node_type IN ('department', 'mayor', 'partida', 'subpartida')),
    CONSTRAINT chk_project_scope CHECK (project_scope IN ('global', 'sucursal', 'proyecto')),
    CONSTRAINT chk_department_root CHECK ((node_type = 'department') = (parent_id IS NULL)),
    CONSTRAINT chk_not_own_parent CHECK (parent_id IS NULL OR parent_id <> id)
);

-- Catalog reads filter by type and scope and order by code
CREATE INDEX idx_catalog_nodes_type_scope ON catalog_nodes(node_type, project_scope, code);
CREATE INDEX idx_catalog_nodes_parent ON catalog_nodes(parent_id);
";

const BUDGETS_SQL: &str = r"
CREATE TABLE budgets (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL,
    budget_type TEXT NOT NULL,
    tax_enabled BOOLEAN NOT NULL DEFAULT false,
    client_view_enabled BOOLEAN NOT NULL DEFAULT false,
    shared_with_construction BOOLEAN NOT NULL DEFAULT false,
    status TEXT NOT NULL DEFAULT 'draft',
    notes TEXT,
    version INTEGER NOT NULL DEFAULT 1,
    selected_nodes UUID[] NOT NULL DEFAULT '{}',
    published_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_budget_type CHECK (budget_type IN ('parametric', 'executive')),
    CONSTRAINT chk_budget_status CHECK (status IN ('draft', 'published')),
    CONSTRAINT chk_version_positive CHECK (version >= 1),
    CONSTRAINT chk_executive_flags CHECK (
        budget_type = 'executive' OR (NOT client_view_enabled AND NOT shared_with_construction)
    ),
    CONSTRAINT chk_published_at CHECK (status = 'published' OR published_at IS NULL)
);

CREATE INDEX idx_budgets_project ON budgets(project_id, budget_type, created_at DESC);
";

const BUDGET_ITEMS_SQL: &str = r"
-- Numeric inputs are unconstrained NUMERIC so any Decimal round-trips exactly
CREATE TABLE budget_items (
    id UUID PRIMARY KEY,
    budget_id UUID NOT NULL REFERENCES budgets(id) ON DELETE CASCADE,
    mayor_id UUID NOT NULL REFERENCES catalog_nodes(id),
    partida_id UUID REFERENCES catalog_nodes(id),
    subpartida_id UUID REFERENCES catalog_nodes(id),
    description TEXT NOT NULL DEFAULT '',
    unit VARCHAR(32) NOT NULL DEFAULT '',
    quantity_real NUMERIC NOT NULL DEFAULT 0,
    waste_pct NUMERIC NOT NULL DEFAULT 0,
    unit_cost NUMERIC NOT NULL DEFAULT 0,
    fee_pct NUMERIC NOT NULL DEFAULT 0,
    supplier_alias VARCHAR(100),
    order_index INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_quantity_non_negative CHECK (quantity_real >= 0),
    CONSTRAINT chk_waste_non_negative CHECK (waste_pct >= 0),
    CONSTRAINT chk_unit_cost_non_negative CHECK (unit_cost >= 0),
    CONSTRAINT chk_fee_non_negative CHECK (fee_pct >= 0),
    CONSTRAINT chk_order_index CHECK (order_index >= 0),
    CONSTRAINT uq_budget_item_order UNIQUE (budget_id, order_index) DEFERRABLE INITIALLY DEFERRED
);

CREATE INDEX idx_budget_items_budget ON budget_items(budget_id, order_index);
";

const PRICE_HISTORY_SQL: &str = r"
-- Append-only: rows are never updated or deleted by the application
CREATE TABLE price_history (
    id UUID PRIMARY KEY,
    subpartida_id UUID NOT NULL REFERENCES catalog_nodes(id),
    price NUMERIC NOT NULL,
    unit VARCHAR(32) NOT NULL DEFAULT '',
    supplier VARCHAR(100),
    recorded_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_price_positive CHECK (price > 0)
);

CREATE INDEX idx_price_history_subpartida ON price_history(subpartida_id, recorded_at DESC);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: validate_catalog_nesting
-- A node's parent must sit exactly one level above it
-- ============================================================
CREATE OR REPLACE FUNCTION validate_catalog_nesting()
RETURNS TRIGGER AS $$
DECLARE
    v_parent_type TEXT;
    v_expected TEXT;
BEGIN
    IF NEW.parent_id IS NULL THEN
        RETURN NEW;
    END IF;

    SELECT node_type INTO v_parent_type FROM catalog_nodes WHERE id = NEW.parent_id;

    v_expected := CASE NEW.node_type
        WHEN 'mayor' THEN 'department'
        WHEN 'partida' THEN 'mayor'
        WHEN 'subpartida' THEN 'partida'
    END;

    IF v_parent_type IS DISTINCT FROM v_expected THEN
        RAISE EXCEPTION 'A % cannot be nested under a %', NEW.node_type, v_parent_type;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_validate_catalog_nesting
BEFORE INSERT OR UPDATE OF parent_id, node_type ON catalog_nodes
FOR EACH ROW
EXECUTE FUNCTION validate_catalog_nesting();

-- ============================================================
-- FUNCTION: touch_updated_at
-- ============================================================
CREATE OR REPLACE FUNCTION touch_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at := now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_catalog_nodes_updated_at
BEFORE UPDATE ON catalog_nodes
FOR EACH ROW
EXECUTE FUNCTION touch_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS price_history CASCADE;
DROP TABLE IF EXISTS budget_items CASCADE;
DROP TABLE IF EXISTS budgets CASCADE;
DROP TABLE IF EXISTS catalog_nodes CASCADE;
DROP FUNCTION IF EXISTS validate_catalog_nesting() CASCADE;
DROP FUNCTION IF EXISTS touch_updated_at() CASCADE;
";
