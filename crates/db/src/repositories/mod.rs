//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Each one also implements the matching port of `dovita_core::store`.

pub mod budget;
pub mod catalog;
pub mod price_history;

pub use budget::BudgetRepository;
pub use catalog::CatalogRepository;
pub use price_history::{PriceHistoryRepository, RecordedPrice};
