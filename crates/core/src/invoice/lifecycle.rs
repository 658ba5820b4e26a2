//! Invoice state transitions.

use chrono::{DateTime, Utc};

use crate::error::{DomainError, DomainResult};
use crate::invoice::types::InvoiceStatus;

const RESOURCE: &str = "invoice";

/// A validated invoice transition with its timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceAction {
    /// Draft invoice was sent.
    Send {
        /// The new status (Sent).
        new_status: InvoiceStatus,
        /// When the invoice was sent.
        sent_at: DateTime<Utc>,
    },
    /// Sent invoice was paid.
    MarkAsPaid {
        /// The new status (Paid).
        new_status: InvoiceStatus,
        /// When the payment was recorded.
        paid_at: DateTime<Utc>,
    },
    /// Draft or sent invoice was cancelled.
    Cancel {
        /// The new status (Cancelled).
        new_status: InvoiceStatus,
        /// When the invoice was cancelled.
        cancelled_at: DateTime<Utc>,
    },
}

impl InvoiceAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub const fn new_status(&self) -> InvoiceStatus {
        match self {
            Self::Send { new_status, .. }
            | Self::MarkAsPaid { new_status, .. }
            | Self::Cancel { new_status, .. } => *new_status,
        }
    }
}

/// Stateless guard for invoice transitions.
pub struct InvoiceLifecycle;

impl InvoiceLifecycle {
    /// Send a draft invoice.
    ///
    /// # Errors
    /// * `InvalidTransition` unless the invoice is a draft
    pub fn send(current: InvoiceStatus) -> DomainResult<InvoiceAction> {
        match current {
            InvoiceStatus::Draft => Ok(InvoiceAction::Send {
                new_status: InvoiceStatus::Sent,
                sent_at: Utc::now(),
            }),
            _ => Err(DomainError::invalid_transition(RESOURCE, current, "send")),
        }
    }

    /// Record the payment of a sent invoice.
    ///
    /// # Errors
    /// * `InvalidTransition` unless the invoice was sent
    pub fn mark_as_paid(current: InvoiceStatus) -> DomainResult<InvoiceAction> {
        match current {
            InvoiceStatus::Sent => Ok(InvoiceAction::MarkAsPaid {
                new_status: InvoiceStatus::Paid,
                paid_at: Utc::now(),
            }),
            _ => Err(DomainError::invalid_transition(
                RESOURCE,
                current,
                "mark as paid",
            )),
        }
    }

    /// Cancel a draft or sent invoice.
    ///
    /// # Errors
    /// * `InvoiceAlreadyPaid` for paid invoices
    /// * `AlreadyCancelled` for cancelled invoices
    pub fn cancel(current: InvoiceStatus) -> DomainResult<InvoiceAction> {
        match current {
            InvoiceStatus::Draft | InvoiceStatus::Sent => Ok(InvoiceAction::Cancel {
                new_status: InvoiceStatus::Cancelled,
                cancelled_at: Utc::now(),
            }),
            InvoiceStatus::Paid => Err(DomainError::InvoiceAlreadyPaid),
            InvoiceStatus::Cancelled => Err(DomainError::AlreadyCancelled {
                resource: "Invoice",
            }),
        }
    }

    /// Check if a status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: InvoiceStatus, to: InvoiceStatus) -> bool {
        matches!(
            (from, to),
            (InvoiceStatus::Draft, InvoiceStatus::Sent)
                | (InvoiceStatus::Sent, InvoiceStatus::Paid)
                | (
                    InvoiceStatus::Draft | InvoiceStatus::Sent,
                    InvoiceStatus::Cancelled
                )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_send_from_draft() {
        assert_eq!(
            InvoiceLifecycle::send(InvoiceStatus::Draft)
                .unwrap()
                .new_status(),
            InvoiceStatus::Sent
        );
    }

    #[rstest]
    #[case(InvoiceStatus::Sent)]
    #[case(InvoiceStatus::Paid)]
    #[case(InvoiceStatus::Cancelled)]
    fn test_send_from_other_statuses_fails(#[case] status: InvoiceStatus) {
        assert!(matches!(
            InvoiceLifecycle::send(status),
            Err(DomainError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_mark_as_paid_only_from_sent() {
        assert_eq!(
            InvoiceLifecycle::mark_as_paid(InvoiceStatus::Sent)
                .unwrap()
                .new_status(),
            InvoiceStatus::Paid
        );
        for status in [
            InvoiceStatus::Draft,
            InvoiceStatus::Paid,
            InvoiceStatus::Cancelled,
        ] {
            assert!(InvoiceLifecycle::mark_as_paid(status).is_err());
        }
    }

    #[rstest]
    #[case(InvoiceStatus::Draft)]
    #[case(InvoiceStatus::Sent)]
    fn test_cancel_open_invoice(#[case] status: InvoiceStatus) {
        assert_eq!(
            InvoiceLifecycle::cancel(status).unwrap().new_status(),
            InvoiceStatus::Cancelled
        );
    }

    #[test]
    fn test_cancel_paid_invoice_fails() {
        assert!(matches!(
            InvoiceLifecycle::cancel(InvoiceStatus::Paid),
            Err(DomainError::InvoiceAlreadyPaid)
        ));
    }

    #[test]
    fn test_cancel_cancelled_invoice_fails() {
        assert!(matches!(
            InvoiceLifecycle::cancel(InvoiceStatus::Cancelled),
            Err(DomainError::AlreadyCancelled { .. })
        ));
    }

    #[test]
    fn test_transition_table_matches_actions() {
        for from in InvoiceStatus::ALL {
            for result in [
                InvoiceLifecycle::send(from),
                InvoiceLifecycle::mark_as_paid(from),
                InvoiceLifecycle::cancel(from),
            ] {
                if let Ok(action) = result {
                    assert!(InvoiceLifecycle::is_valid_transition(
                        from,
                        action.new_status()
                    ));
                }
            }
        }
    }
}
