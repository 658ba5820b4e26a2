//! Mapping of database errors into domain errors.

use orderdesk_core::DomainError;
use sea_orm::{DbErr, SqlErr};

/// Converts a `DbErr` into a `DomainError`.
///
/// Unique violations become `Conflict`, foreign key violations become
/// `Validation`, everything else is a `Database` error.
pub fn map_db_err(err: DbErr) -> DomainError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            DomainError::Conflict(conflict_message(&detail))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            DomainError::Validation("referenced record does not exist".to_string())
        }
        _ => {
            tracing::error!(error = %err, "database error");
            DomainError::Database(err.to_string())
        }
    }
}

/// Turns a constraint name into a readable conflict message.
fn conflict_message(detail: &str) -> String {
    const KNOWN: [(&str, &str); 6] = [
        ("uq_customers_account_email", "A customer with this email already exists"),
        ("uq_orders_account_reference", "Order reference already taken"),
        ("uq_invoices_account_number", "Invoice number already taken"),
        ("uq_invoices_open_order", "Order already has an open invoice"),
        (
            "uq_fulfillment_services_account_name",
            "A fulfillment service with this name already exists",
        ),
        ("accounts_slug_key", "Account slug already taken"),
    ];

    KNOWN
        .iter()
        .find(|(constraint, _)| detail.contains(constraint))
        .map_or_else(
            || "Record already exists".to_string(),
            |(_, message)| (*message).to_string(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_known_constraint() {
        assert_eq!(
            conflict_message(
                "duplicate key value violates unique constraint \"uq_customers_account_email\""
            ),
            "A customer with this email already exists"
        );
    }

    #[test]
    fn test_conflict_message_unknown_constraint() {
        assert_eq!(conflict_message("something else"), "Record already exists");
    }

    #[test]
    fn test_plain_errors_map_to_database() {
        let err = map_db_err(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, DomainError::Database(_)));
    }
}
