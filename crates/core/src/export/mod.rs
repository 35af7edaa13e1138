//! Data handed to the PDF and Excel export routines.
//!
//! The document formats belong to the renderers; this module only fixes the
//! shape and the numbers.

pub mod error;
pub mod snapshot;
pub mod types;

pub use error::ExportError;
pub use types::{
    ExportAudience, ExportGroup, ExportHeader, ExportItem, ExportSnapshot, ExportTotals,
};
