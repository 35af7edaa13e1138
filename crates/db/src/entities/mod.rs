//! `SeaORM` entities, one module per table.

pub mod budget_items;
pub mod budgets;
pub mod catalog_nodes;
pub mod price_history;

pub mod prelude {
    //! Entity re-exports.

    pub use super::budget_items::Entity as BudgetItems;
    pub use super::budgets::Entity as Budgets;
    pub use super::catalog_nodes::Entity as CatalogNodes;
    pub use super::price_history::Entity as PriceHistory;
}
