//! Shared types, errors, and configuration for Dovita.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Money and percentage helpers with decimal precision
//! - Application-wide error types
//! - Configuration management
//! - Tracing subscriber bootstrap for binaries

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::{AppConfig, OrphanPolicy};
pub use error::{AppError, AppResult};
