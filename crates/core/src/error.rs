//! Domain error types shared by all lifecycles.
//!
//! Guard clauses return these instead of silently refusing a transition.

use orderdesk_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors raised by business rules and the persistence layer above them.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The action is not allowed from the current status.
    #[error("Cannot {action} {resource} in status {from}")]
    InvalidTransition {
        /// Resource kind (e.g. "order").
        resource: &'static str,
        /// Current status.
        from: String,
        /// Attempted action (e.g. "ship").
        action: &'static str,
    },

    /// The resource is already cancelled.
    #[error("{resource} is already cancelled")]
    AlreadyCancelled {
        /// Resource kind.
        resource: &'static str,
    },

    /// A paid invoice cannot be cancelled.
    #[error("Invoice is already paid")]
    InvoiceAlreadyPaid,

    /// An order without lines cannot be validated.
    #[error("Order has no lines")]
    EmptyOrder,

    /// Lines can only change while the order is pending.
    #[error("Order in status {status} cannot be edited")]
    OrderNotEditable {
        /// Current order status.
        status: String,
    },

    /// Only pending and cancelled orders can be deleted.
    #[error("Order in status {status} cannot be deleted")]
    OrderNotDeletable {
        /// Current order status.
        status: String,
    },

    /// A fulfillment of the order has already shipped.
    #[error("Order has shipped fulfillments")]
    ShipmentInProgress,

    /// The order already has a draft or sent invoice.
    #[error("Order already has an open invoice")]
    OpenInvoiceExists,

    /// The order cannot receive fulfillments in its current status.
    #[error("Order in status {status} cannot be fulfilled")]
    OrderNotFulfillable {
        /// Current order status.
        status: String,
    },

    /// The fulfillment service is inactive.
    #[error("Fulfillment service is inactive")]
    ServiceInactive,

    /// Input failed validation.
    #[error("{0}")]
    Validation(String),

    /// Resource not found in the current account.
    #[error("{resource} {id} not found")]
    NotFound {
        /// Resource kind.
        resource: &'static str,
        /// Requested id.
        id: Uuid,
    },

    /// Uniqueness conflict.
    #[error("{0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl DomainError {
    /// Shorthand for an invalid transition.
    pub fn invalid_transition(
        resource: &'static str,
        from: impl std::fmt::Display,
        action: &'static str,
    ) -> Self {
        Self::InvalidTransition {
            resource,
            from: from.to_string(),
            action,
        }
    }

    /// Shorthand for a missing resource.
    #[must_use]
    pub const fn not_found(resource: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource, id }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Conflict(_) => 409,
            Self::Database(_) => 500,
            _ => 422,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::AlreadyCancelled { .. } => "ALREADY_CANCELLED",
            Self::InvoiceAlreadyPaid => "INVOICE_ALREADY_PAID",
            Self::EmptyOrder => "EMPTY_ORDER",
            Self::OrderNotEditable { .. } => "ORDER_NOT_EDITABLE",
            Self::OrderNotDeletable { .. } => "ORDER_NOT_DELETABLE",
            Self::ShipmentInProgress => "SHIPMENT_IN_PROGRESS",
            Self::OpenInvoiceExists => "OPEN_INVOICE_EXISTS",
            Self::OrderNotFulfillable { .. } => "ORDER_NOT_FULFILLABLE",
            Self::ServiceInactive => "SERVICE_INACTIVE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::NotFound { .. } => Self::NotFound(err.to_string()),
            DomainError::Conflict(msg) => Self::Conflict(msg),
            DomainError::Database(msg) => Self::Database(msg),
            other => Self::business_rule(other.error_code(), other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_message() {
        let err = DomainError::invalid_transition("fulfillment", "delivered", "ship");
        assert_eq!(err.to_string(), "Cannot ship fulfillment in status delivered");
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(DomainError::Validation("x".into()).status_code(), 400);
        assert_eq!(
            DomainError::not_found("order", Uuid::nil()).status_code(),
            404
        );
        assert_eq!(DomainError::Conflict("x".into()).status_code(), 409);
        assert_eq!(DomainError::Database("x".into()).status_code(), 500);
        assert_eq!(DomainError::InvoiceAlreadyPaid.status_code(), 422);
        assert_eq!(DomainError::EmptyOrder.status_code(), 422);
    }

    #[test]
    fn test_conversion_into_app_error_keeps_code() {
        let app: AppError = DomainError::AlreadyCancelled { resource: "Order" }.into();
        assert_eq!(app.status_code(), 422);
        assert_eq!(app.error_code(), "ALREADY_CANCELLED");
        assert_eq!(
            app.to_string(),
            "Business rule violation: Order is already cancelled"
        );

        let app: AppError = DomainError::not_found("customer", Uuid::nil()).into();
        assert_eq!(app.status_code(), 404);

        let app: AppError = DomainError::Conflict("duplicate email".into()).into();
        assert_eq!(app.error_code(), "CONFLICT");
    }
}
