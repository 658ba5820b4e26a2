//! Fulfillment domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shipment status of a fulfillment.
///
/// Valid transitions:
/// - Pending → Processing (process)
/// - Pending | Processing → Shipped (ship)
/// - Shipped → Delivered (deliver)
/// - Pending | Processing → Cancelled (cancel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentStatus {
    /// Waiting to be picked up by the warehouse.
    Pending,
    /// Being prepared.
    Processing,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer (terminal).
    Delivered,
    /// Cancelled before shipping (terminal).
    Cancelled,
}

impl FulfillmentStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Returns true if the shipment has not left the warehouse yet.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    /// Returns true once the carrier has the parcel.
    #[must_use]
    pub const fn has_shipped(&self) -> bool {
        matches!(self, Self::Shipped | Self::Delivered)
    }
}

impl fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in FulfillmentStatus::ALL {
            assert_eq!(FulfillmentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(FulfillmentStatus::parse("lost"), None);
    }

    #[test]
    fn test_open_and_shipped_are_disjoint() {
        for status in FulfillmentStatus::ALL {
            assert!(!(status.is_open() && status.has_shipped()));
        }
        assert!(!FulfillmentStatus::Cancelled.is_open());
        assert!(!FulfillmentStatus::Cancelled.has_shipped());
    }
}
