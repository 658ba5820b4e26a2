//! Invoice lifecycle and amounts.
//!
//! # Modules
//!
//! - `types` - `InvoiceStatus`
//! - `lifecycle` - send / mark as paid / cancel guards
//! - `totals` - tax computation, numbering, due dates

pub mod lifecycle;
pub mod totals;
pub mod types;

pub use lifecycle::{InvoiceAction, InvoiceLifecycle};
pub use totals::{InvoiceTotals, due_date, format_invoice_number, is_overdue};
pub use types::InvoiceStatus;
