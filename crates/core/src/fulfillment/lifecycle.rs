//! Fulfillment state transitions.

use chrono::{DateTime, Utc};

use crate::error::{DomainError, DomainResult};
use crate::fulfillment::types::FulfillmentStatus;
use crate::order::OrderStatus;

const RESOURCE: &str = "fulfillment";

/// A validated fulfillment transition with its timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FulfillmentAction {
    /// Warehouse started preparing the parcel.
    Process {
        /// The new status (Processing).
        new_status: FulfillmentStatus,
    },
    /// Parcel handed to the carrier.
    Ship {
        /// The new status (Shipped).
        new_status: FulfillmentStatus,
        /// When the parcel shipped.
        shipped_at: DateTime<Utc>,
    },
    /// Parcel received.
    Deliver {
        /// The new status (Delivered).
        new_status: FulfillmentStatus,
        /// When the parcel was delivered.
        delivered_at: DateTime<Utc>,
    },
    /// Fulfillment abandoned before shipping.
    Cancel {
        /// The new status (Cancelled).
        new_status: FulfillmentStatus,
        /// When the fulfillment was cancelled.
        cancelled_at: DateTime<Utc>,
    },
}

impl FulfillmentAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub const fn new_status(&self) -> FulfillmentStatus {
        match self {
            Self::Process { new_status }
            | Self::Ship { new_status, .. }
            | Self::Deliver { new_status, .. }
            | Self::Cancel { new_status, .. } => *new_status,
        }
    }
}

/// Stateless guard for fulfillment transitions.
pub struct FulfillmentLifecycle;

impl FulfillmentLifecycle {
    /// Start processing a pending fulfillment.
    ///
    /// # Errors
    /// * `InvalidTransition` unless the fulfillment is pending
    pub fn process(current: FulfillmentStatus) -> DomainResult<FulfillmentAction> {
        match current {
            FulfillmentStatus::Pending => Ok(FulfillmentAction::Process {
                new_status: FulfillmentStatus::Processing,
            }),
            _ => Err(DomainError::invalid_transition(RESOURCE, current, "process")),
        }
    }

    /// Ship a pending or processing fulfillment.
    ///
    /// # Errors
    /// * `InvalidTransition` from any other status
    pub fn ship(current: FulfillmentStatus) -> DomainResult<FulfillmentAction> {
        if current.is_open() {
            Ok(FulfillmentAction::Ship {
                new_status: FulfillmentStatus::Shipped,
                shipped_at: Utc::now(),
            })
        } else {
            Err(DomainError::invalid_transition(RESOURCE, current, "ship"))
        }
    }

    /// Mark a shipped fulfillment as delivered.
    ///
    /// # Errors
    /// * `InvalidTransition` unless the fulfillment shipped
    pub fn deliver(current: FulfillmentStatus) -> DomainResult<FulfillmentAction> {
        match current {
            FulfillmentStatus::Shipped => Ok(FulfillmentAction::Deliver {
                new_status: FulfillmentStatus::Delivered,
                delivered_at: Utc::now(),
            }),
            _ => Err(DomainError::invalid_transition(RESOURCE, current, "deliver")),
        }
    }

    /// Cancel a fulfillment that has not shipped.
    ///
    /// # Errors
    /// * `AlreadyCancelled` for cancelled fulfillments
    /// * `InvalidTransition` once shipped
    pub fn cancel(current: FulfillmentStatus) -> DomainResult<FulfillmentAction> {
        match current {
            FulfillmentStatus::Pending | FulfillmentStatus::Processing => {
                Ok(FulfillmentAction::Cancel {
                    new_status: FulfillmentStatus::Cancelled,
                    cancelled_at: Utc::now(),
                })
            }
            FulfillmentStatus::Cancelled => Err(DomainError::AlreadyCancelled {
                resource: "Fulfillment",
            }),
            _ => Err(DomainError::invalid_transition(RESOURCE, current, "cancel")),
        }
    }

    /// Ensure an order may receive a new fulfillment.
    ///
    /// # Errors
    /// * `OrderNotFulfillable` unless the order is validated or invoiced
    pub fn can_fulfill(order_status: OrderStatus) -> DomainResult<()> {
        match order_status {
            OrderStatus::Validated | OrderStatus::Invoiced => Ok(()),
            _ => Err(DomainError::OrderNotFulfillable {
                status: order_status.to_string(),
            }),
        }
    }

    /// Check if a status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: FulfillmentStatus, to: FulfillmentStatus) -> bool {
        matches!(
            (from, to),
            (FulfillmentStatus::Pending, FulfillmentStatus::Processing)
                | (
                    FulfillmentStatus::Pending | FulfillmentStatus::Processing,
                    FulfillmentStatus::Shipped | FulfillmentStatus::Cancelled
                )
                | (FulfillmentStatus::Shipped, FulfillmentStatus::Delivered)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_full_happy_path() {
        let status = FulfillmentStatus::Pending;
        let status = FulfillmentLifecycle::process(status).unwrap().new_status();
        assert_eq!(status, FulfillmentStatus::Processing);
        let status = FulfillmentLifecycle::ship(status).unwrap().new_status();
        assert_eq!(status, FulfillmentStatus::Shipped);
        let status = FulfillmentLifecycle::deliver(status).unwrap().new_status();
        assert_eq!(status, FulfillmentStatus::Delivered);
    }

    #[test]
    fn test_ship_directly_from_pending() {
        let action = FulfillmentLifecycle::ship(FulfillmentStatus::Pending).unwrap();
        assert!(matches!(action, FulfillmentAction::Ship { .. }));
    }

    #[rstest]
    #[case(FulfillmentStatus::Shipped)]
    #[case(FulfillmentStatus::Delivered)]
    #[case(FulfillmentStatus::Cancelled)]
    fn test_ship_from_closed_status_fails(#[case] status: FulfillmentStatus) {
        assert!(matches!(
            FulfillmentLifecycle::ship(status),
            Err(DomainError::InvalidTransition { .. })
        ));
    }

    #[rstest]
    #[case(FulfillmentStatus::Pending)]
    #[case(FulfillmentStatus::Processing)]
    #[case(FulfillmentStatus::Delivered)]
    #[case(FulfillmentStatus::Cancelled)]
    fn test_deliver_requires_shipped(#[case] status: FulfillmentStatus) {
        assert!(FulfillmentLifecycle::deliver(status).is_err());
    }

    #[test]
    fn test_process_only_from_pending() {
        assert!(FulfillmentLifecycle::process(FulfillmentStatus::Processing).is_err());
        assert!(FulfillmentLifecycle::process(FulfillmentStatus::Shipped).is_err());
    }

    #[test]
    fn test_cancel_rules() {
        assert!(FulfillmentLifecycle::cancel(FulfillmentStatus::Pending).is_ok());
        assert!(FulfillmentLifecycle::cancel(FulfillmentStatus::Processing).is_ok());
        assert!(matches!(
            FulfillmentLifecycle::cancel(FulfillmentStatus::Cancelled),
            Err(DomainError::AlreadyCancelled { .. })
        ));
        assert!(matches!(
            FulfillmentLifecycle::cancel(FulfillmentStatus::Shipped),
            Err(DomainError::InvalidTransition { .. })
        ));
    }

    #[rstest]
    #[case(OrderStatus::Pending, false)]
    #[case(OrderStatus::Validated, true)]
    #[case(OrderStatus::Invoiced, true)]
    #[case(OrderStatus::Cancelled, false)]
    fn test_can_fulfill(#[case] order: OrderStatus, #[case] allowed: bool) {
        assert_eq!(FulfillmentLifecycle::can_fulfill(order).is_ok(), allowed);
    }

    #[test]
    fn test_transition_table_matches_actions() {
        for from in FulfillmentStatus::ALL {
            for result in [
                FulfillmentLifecycle::process(from),
                FulfillmentLifecycle::ship(from),
                FulfillmentLifecycle::deliver(from),
                FulfillmentLifecycle::cancel(from),
            ] {
                if let Ok(action) = result {
                    assert!(FulfillmentLifecycle::is_valid_transition(
                        from,
                        action.new_status()
                    ));
                }
            }
        }
    }
}
