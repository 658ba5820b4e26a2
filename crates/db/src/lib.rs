//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Query objects for filtered listings
//! - Repository abstractions for data access, audited per write
//! - Service objects for multi-table operations
//! - Database migrations

pub mod entities;
pub mod error;
pub mod migration;
pub mod queries;
pub mod repositories;
pub mod services;
mod tracking;

pub use error::map_db_err;
pub use repositories::{
    AccountRepository, Actor, AuditRepository, CustomerRepository, FulfillmentRepository,
    FulfillmentServiceRepository, InvoiceRepository, OrderRepository, ReportRepository,
};
pub use services::{CancelOrder, CreateInvoice, Service};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection with explicit pool bounds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .min_connections(min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}
