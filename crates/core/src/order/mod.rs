//! Order lifecycle and line arithmetic.
//!
//! # Modules
//!
//! - `types` - `OrderStatus`
//! - `lifecycle` - Guarded status transitions and the cancellation plan
//! - `lines` - Line totals, order totals and references

pub mod lifecycle;
pub mod lines;
pub mod types;

#[cfg(test)]
mod lifecycle_props;

pub use lifecycle::{CancellationPlan, OrderAction, OrderLifecycle};
pub use lines::{
    format_order_reference, line_total, max_amount, order_total, round_amount, validate_line,
};
pub use types::OrderStatus;
