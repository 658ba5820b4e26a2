//! Core business rules for Orderdesk.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Status lifecycles, amount calculations and audit diffing live here; the
//! persistence layer loads state, asks these guards what to do and stores
//! the outcome.
//!
//! # Modules
//!
//! - `order` - Order lifecycle, lines and totals
//! - `invoice` - Invoice lifecycle, tax and numbering
//! - `fulfillment` - Shipment lifecycle
//! - `values` - Value objects (person names, tracking info)
//! - `audit` - Tracked field diffing for the audit trail
//! - `reports` - Sales reporting

pub mod audit;
pub mod error;
pub mod fulfillment;
pub mod invoice;
pub mod order;
pub mod reports;
pub mod values;

pub use error::{DomainError, DomainResult};
