//! Core budgeting logic for Dovita.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, cost formulas, rollups and wizard validation live here;
//! persistence is reached only through the async ports in [`store`].
//!
//! # Modules
//!
//! - `catalog` - Department / mayor / partida / subpartida hierarchy
//! - `budget` - Line-item cost calculator, aggregator and budget lifecycle
//! - `wizard` - Selection and validation state machine for the budget builders
//! - `store` - Persistence ports, in-memory adapters and save orchestration
//! - `export` - Data handed to PDF/Excel renderers

pub mod budget;
pub mod catalog;
pub mod export;
pub mod store;
pub mod wizard;
