//! Sales reporting.
//!
//! Pure aggregation over order and invoice rows:
//! - per-status breakdowns
//! - sales summary (invoiced, paid, outstanding, overdue)

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
