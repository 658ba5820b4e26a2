//! `SeaORM` entity definitions.

#![allow(missing_docs)]

pub mod account_events;
pub mod accounts;
pub mod customers;
pub mod fulfillment_services;
pub mod fulfillments;
pub mod invoices;
pub mod order_lines;
pub mod orders;
pub mod resources;
pub mod sea_orm_active_enums;
