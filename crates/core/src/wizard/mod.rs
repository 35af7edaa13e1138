//! Budget builder wizard.
//!
//! Both budget variants walk the same four steps:
//! `ProjectInfo → NodeSelection → ItemConfiguration → Preview`.
//!
//! # Modules
//!
//! - `types` - Steps, selection set and user events
//! - `validation` - Per-step predicates and user-facing issues
//! - `state` - The session value and its reducer
//! - `error` - Rejected events

pub mod error;
pub mod state;
pub mod types;
pub mod validation;

#[cfg(test)]
mod state_props;

pub use error::WizardError;
pub use state::WizardState;
pub use types::{SelectionSet, WizardEvent, WizardStep};
pub use validation::ValidationIssue;
