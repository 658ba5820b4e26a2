//! Service objects for operations spanning several tables.
//!
//! Each service is a command built from its inputs and consumed by
//! [`Service::call`], which runs everything in one transaction.

mod cancel_order;
mod create_invoice;

pub use cancel_order::{CancelOrder, CancelledOrder};
pub use create_invoice::{CreateInvoice, DEFAULT_DUE_DAYS, InvoicedOrder};

use async_trait::async_trait;
use orderdesk_core::DomainResult;

/// A command object with a single entry point.
#[async_trait]
pub trait Service {
    /// What a successful call returns.
    type Output;

    /// Runs the command.
    async fn call(self) -> DomainResult<Self::Output>;
}
