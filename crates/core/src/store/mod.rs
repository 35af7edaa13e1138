//! Persistence ports, reference adapters and save orchestration.
//!
//! The core never talks to a database directly. Adapters implement the
//! ports in [`ports`]; `dovita-db` provides the PostgreSQL ones.

pub mod error;
pub mod memory;
pub mod ports;
pub mod saver;

pub use error::{SaveError, StoreError};
pub use memory::{InMemoryBudgetStore, InMemoryPriceHistory};
pub use ports::{BudgetStore, PriceHistoryRecorder, PriceSample};
pub use saver::{BudgetSaver, PriceHistoryFailure, PriceHistoryReport, SaveOutcome};
