//! Shipment lifecycle.

pub mod lifecycle;
pub mod types;

pub use lifecycle::{FulfillmentAction, FulfillmentLifecycle};
pub use types::FulfillmentStatus;
