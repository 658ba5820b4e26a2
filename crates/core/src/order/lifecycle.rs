//! Order state transitions.
//!
//! All checks are pure: the caller loads the current state, asks the
//! lifecycle for the resulting action and persists it.

use chrono::{DateTime, Utc};

use crate::error::{DomainError, DomainResult};
use crate::fulfillment::FulfillmentStatus;
use crate::invoice::InvoiceStatus;
use crate::order::types::OrderStatus;

const RESOURCE: &str = "order";

/// A validated order transition with its timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderAction {
    /// Pending order was validated.
    Validate {
        /// The new status (Validated).
        new_status: OrderStatus,
        /// When the order was validated.
        validated_at: DateTime<Utc>,
    },
    /// Validated order was invoiced.
    Invoice {
        /// The new status (Invoiced).
        new_status: OrderStatus,
        /// When the invoice was issued.
        invoiced_at: DateTime<Utc>,
    },
    /// The order's invoice was cancelled; the order can be invoiced again.
    RevertInvoice {
        /// The new status (Validated).
        new_status: OrderStatus,
    },
}

impl OrderAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub const fn new_status(&self) -> OrderStatus {
        match self {
            Self::Validate { new_status, .. }
            | Self::Invoice { new_status, .. }
            | Self::RevertInvoice { new_status } => *new_status,
        }
    }
}

/// What an order cancellation must touch besides the order row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationPlan {
    /// Always `Cancelled`.
    pub new_status: OrderStatus,
    /// When the cancellation happened.
    pub cancelled_at: DateTime<Utc>,
    /// Optional free-text reason.
    pub reason: Option<String>,
    /// The open (draft/sent) invoice of the order is cancelled as well.
    pub cancel_invoice: bool,
    /// Pending/processing fulfillments are cancelled as well.
    pub cancel_open_fulfillments: bool,
}

/// Stateless guard for order transitions.
pub struct OrderLifecycle;

impl OrderLifecycle {
    /// Validate a pending order.
    ///
    /// # Errors
    /// * `EmptyOrder` if the order has no lines
    /// * `InvalidTransition` if the order is not pending
    pub fn validate(current: OrderStatus, line_count: usize) -> DomainResult<OrderAction> {
        match current {
            OrderStatus::Pending if line_count == 0 => Err(DomainError::EmptyOrder),
            OrderStatus::Pending => Ok(OrderAction::Validate {
                new_status: OrderStatus::Validated,
                validated_at: Utc::now(),
            }),
            OrderStatus::Cancelled => Err(DomainError::AlreadyCancelled { resource: "Order" }),
            _ => Err(DomainError::invalid_transition(RESOURCE, current, "validate")),
        }
    }

    /// Mark a validated order as invoiced.
    ///
    /// # Errors
    /// * `InvalidTransition` unless the order is validated
    pub fn invoice(current: OrderStatus) -> DomainResult<OrderAction> {
        match current {
            OrderStatus::Validated => Ok(OrderAction::Invoice {
                new_status: OrderStatus::Invoiced,
                invoiced_at: Utc::now(),
            }),
            OrderStatus::Cancelled => Err(DomainError::AlreadyCancelled { resource: "Order" }),
            _ => Err(DomainError::invalid_transition(RESOURCE, current, "invoice")),
        }
    }

    /// Return an invoiced order to validated after its invoice was cancelled.
    ///
    /// # Errors
    /// * `InvalidTransition` unless the order is invoiced
    pub fn revert_invoice(current: OrderStatus) -> DomainResult<OrderAction> {
        match current {
            OrderStatus::Invoiced => Ok(OrderAction::RevertInvoice {
                new_status: OrderStatus::Validated,
            }),
            _ => Err(DomainError::invalid_transition(
                RESOURCE,
                current,
                "revert invoice of",
            )),
        }
    }

    /// Plan the cancellation of an order.
    ///
    /// Pending and validated orders are cancelled on their own. An invoiced
    /// order drags its open invoice along; a paid invoice blocks the
    /// cancellation. Open fulfillments are always cancelled, shipped ones
    /// block it.
    ///
    /// # Errors
    /// * `AlreadyCancelled` if the order is cancelled
    /// * `InvoiceAlreadyPaid` if the order's invoice is paid
    /// * `ShipmentInProgress` if any fulfillment has shipped
    pub fn cancel(
        current: OrderStatus,
        invoice: Option<InvoiceStatus>,
        fulfillments: &[FulfillmentStatus],
        reason: Option<String>,
    ) -> DomainResult<CancellationPlan> {
        if current == OrderStatus::Cancelled {
            return Err(DomainError::AlreadyCancelled { resource: "Order" });
        }

        if fulfillments.iter().any(FulfillmentStatus::has_shipped) {
            return Err(DomainError::ShipmentInProgress);
        }

        let cancel_invoice = match (current, invoice) {
            (OrderStatus::Invoiced, Some(InvoiceStatus::Paid)) => {
                return Err(DomainError::InvoiceAlreadyPaid);
            }
            (OrderStatus::Invoiced, Some(status)) => status.is_open(),
            _ => false,
        };

        Ok(CancellationPlan {
            new_status: OrderStatus::Cancelled,
            cancelled_at: Utc::now(),
            reason: reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            cancel_invoice,
            cancel_open_fulfillments: fulfillments.iter().any(FulfillmentStatus::is_open),
        })
    }

    /// Ensure lines and header amounts may change.
    ///
    /// # Errors
    /// * `OrderNotEditable` unless the order is pending
    pub fn ensure_editable(current: OrderStatus) -> DomainResult<()> {
        if current.is_editable() {
            Ok(())
        } else {
            Err(DomainError::OrderNotEditable {
                status: current.to_string(),
            })
        }
    }

    /// Ensure the order row may be deleted.
    ///
    /// # Errors
    /// * `OrderNotDeletable` unless the order is pending or cancelled
    pub fn ensure_deletable(current: OrderStatus) -> DomainResult<()> {
        if current.is_deletable() {
            Ok(())
        } else {
            Err(DomainError::OrderNotDeletable {
                status: current.to_string(),
            })
        }
    }

    /// Check if a status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            (OrderStatus::Pending, OrderStatus::Validated)
                | (OrderStatus::Validated, OrderStatus::Invoiced)
                | (OrderStatus::Invoiced, OrderStatus::Validated)
                | (
                    OrderStatus::Pending | OrderStatus::Validated | OrderStatus::Invoiced,
                    OrderStatus::Cancelled
                )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_validate_pending_with_lines() {
        let action = OrderLifecycle::validate(OrderStatus::Pending, 2).unwrap();
        assert_eq!(action.new_status(), OrderStatus::Validated);
    }

    #[test]
    fn test_validate_empty_order_fails() {
        assert!(matches!(
            OrderLifecycle::validate(OrderStatus::Pending, 0),
            Err(DomainError::EmptyOrder)
        ));
    }

    #[rstest]
    #[case(OrderStatus::Validated)]
    #[case(OrderStatus::Invoiced)]
    fn test_validate_from_non_pending_fails(#[case] status: OrderStatus) {
        assert!(matches!(
            OrderLifecycle::validate(status, 1),
            Err(DomainError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_validate_cancelled_reports_already_cancelled() {
        assert!(matches!(
            OrderLifecycle::validate(OrderStatus::Cancelled, 1),
            Err(DomainError::AlreadyCancelled { .. })
        ));
    }

    #[test]
    fn test_invoice_only_from_validated() {
        assert_eq!(
            OrderLifecycle::invoice(OrderStatus::Validated)
                .unwrap()
                .new_status(),
            OrderStatus::Invoiced
        );
        assert!(OrderLifecycle::invoice(OrderStatus::Pending).is_err());
        assert!(OrderLifecycle::invoice(OrderStatus::Invoiced).is_err());
        assert!(OrderLifecycle::invoice(OrderStatus::Cancelled).is_err());
    }

    #[test]
    fn test_revert_invoice() {
        assert_eq!(
            OrderLifecycle::revert_invoice(OrderStatus::Invoiced)
                .unwrap()
                .new_status(),
            OrderStatus::Validated
        );
        assert!(OrderLifecycle::revert_invoice(OrderStatus::Validated).is_err());
    }

    #[rstest]
    #[case(OrderStatus::Pending)]
    #[case(OrderStatus::Validated)]
    fn test_cancel_without_invoice(#[case] status: OrderStatus) {
        let plan = OrderLifecycle::cancel(status, None, &[], None).unwrap();
        assert_eq!(plan.new_status, OrderStatus::Cancelled);
        assert!(!plan.cancel_invoice);
        assert!(!plan.cancel_open_fulfillments);
    }

    #[rstest]
    #[case(InvoiceStatus::Draft)]
    #[case(InvoiceStatus::Sent)]
    fn test_cancel_invoiced_order_cancels_open_invoice(#[case] invoice: InvoiceStatus) {
        let plan = OrderLifecycle::cancel(OrderStatus::Invoiced, Some(invoice), &[], None).unwrap();
        assert!(plan.cancel_invoice);
    }

    #[test]
    fn test_cancel_invoiced_order_with_paid_invoice_fails() {
        assert!(matches!(
            OrderLifecycle::cancel(
                OrderStatus::Invoiced,
                Some(InvoiceStatus::Paid),
                &[],
                None
            ),
            Err(DomainError::InvoiceAlreadyPaid)
        ));
    }

    #[test]
    fn test_cancel_invoiced_order_with_cancelled_invoice() {
        let plan = OrderLifecycle::cancel(
            OrderStatus::Invoiced,
            Some(InvoiceStatus::Cancelled),
            &[],
            None,
        )
        .unwrap();
        assert!(!plan.cancel_invoice);
    }

    #[test]
    fn test_cancel_twice_fails() {
        assert!(matches!(
            OrderLifecycle::cancel(OrderStatus::Cancelled, None, &[], None),
            Err(DomainError::AlreadyCancelled { .. })
        ));
    }

    #[test]
    fn test_cancel_with_open_fulfillments() {
        let plan = OrderLifecycle::cancel(
            OrderStatus::Validated,
            None,
            &[FulfillmentStatus::Pending, FulfillmentStatus::Cancelled],
            Some("  customer changed mind ".to_string()),
        )
        .unwrap();
        assert!(plan.cancel_open_fulfillments);
        assert_eq!(plan.reason.as_deref(), Some("customer changed mind"));
    }

    #[rstest]
    #[case(FulfillmentStatus::Shipped)]
    #[case(FulfillmentStatus::Delivered)]
    fn test_cancel_with_shipped_fulfillment_fails(#[case] shipped: FulfillmentStatus) {
        assert!(matches!(
            OrderLifecycle::cancel(OrderStatus::Validated, None, &[shipped], None),
            Err(DomainError::ShipmentInProgress)
        ));
    }

    #[test]
    fn test_blank_reason_is_dropped() {
        let plan =
            OrderLifecycle::cancel(OrderStatus::Pending, None, &[], Some("   ".into())).unwrap();
        assert_eq!(plan.reason, None);
    }

    #[test]
    fn test_ensure_editable_and_deletable() {
        assert!(OrderLifecycle::ensure_editable(OrderStatus::Pending).is_ok());
        assert!(matches!(
            OrderLifecycle::ensure_editable(OrderStatus::Validated),
            Err(DomainError::OrderNotEditable { .. })
        ));
        assert!(OrderLifecycle::ensure_deletable(OrderStatus::Cancelled).is_ok());
        assert!(matches!(
            OrderLifecycle::ensure_deletable(OrderStatus::Invoiced),
            Err(DomainError::OrderNotDeletable { .. })
        ));
    }

    #[test]
    fn test_is_valid_transition() {
        assert!(OrderLifecycle::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Validated
        ));
        assert!(OrderLifecycle::is_valid_transition(
            OrderStatus::Invoiced,
            OrderStatus::Cancelled
        ));
        assert!(!OrderLifecycle::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Invoiced
        ));
        assert!(!OrderLifecycle::is_valid_transition(
            OrderStatus::Cancelled,
            OrderStatus::Pending
        ));
    }
}
