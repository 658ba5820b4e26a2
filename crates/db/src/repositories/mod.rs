//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every operation is scoped by account; every write that changes a tracked
//! field runs in one transaction together with its audit events.

pub mod account;
pub mod audit;
pub mod customer;
pub mod fulfillment;
pub mod fulfillment_service;
pub mod invoice;
pub mod order;
pub mod report;

pub use account::{AccountRepository, CreateAccountInput, Sequence, UpdateAccountInput};
pub use audit::{AuditRepository, EventWithResource};
pub use customer::{CreateCustomerInput, CustomerRepository, UpdateCustomerInput};
pub use fulfillment::{CreateFulfillmentInput, FulfillmentRepository, ShipmentInput};
pub use fulfillment_service::{
    CreateFulfillmentServiceInput, FulfillmentServiceRepository, UpdateFulfillmentServiceInput,
};
pub use invoice::InvoiceRepository;
pub use order::{
    CreateOrderInput, NewLineInput, OrderRepository, OrderWithLines, UpdateLineInput,
    UpdateOrderInput,
};
pub use report::ReportRepository;

use uuid::Uuid;

/// Tenant and acting user of a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Account every read and write is scoped to.
    pub account_id: Uuid,
    /// User recorded as author of audit events.
    pub author_id: Option<Uuid>,
}

impl Actor {
    /// Actor for a user acting on an account.
    #[must_use]
    pub const fn new(account_id: Uuid, author_id: Uuid) -> Self {
        Self {
            account_id,
            author_id: Some(author_id),
        }
    }

    /// Actor for system writes without a user (seeding, maintenance).
    #[must_use]
    pub const fn system(account_id: Uuid) -> Self {
        Self {
            account_id,
            author_id: None,
        }
    }
}
