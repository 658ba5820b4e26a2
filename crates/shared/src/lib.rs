//! Shared types, errors, and configuration for Orderdesk.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision
//! - Typed IDs for tenant-scoped entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token service

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::{AppConfig, BillingConfig};
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
