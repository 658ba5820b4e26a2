//! Order domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status.
///
/// Orders move through:
/// - Pending → Validated (validate, needs at least one line)
/// - Validated → Invoiced (invoice creation)
/// - Invoiced → Validated (invoice cancelled on its own)
/// - Pending | Validated | Invoiced → Cancelled (cancellation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order is being composed; lines can change.
    Pending,
    /// Order was checked and frozen.
    Validated,
    /// An invoice was issued for the order.
    Invoiced,
    /// Order was cancelled (terminal).
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Validated,
        Self::Invoiced,
        Self::Cancelled,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Validated => "validated",
            Self::Invoiced => "invoiced",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "validated" => Some(Self::Validated),
            "invoiced" => Some(Self::Invoiced),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Validated => "Validated",
            Self::Invoiced => "Invoiced",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Returns true if lines and totals can still change.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if the order row may be deleted.
    #[must_use]
    pub const fn is_deletable(&self) -> bool {
        matches!(self, Self::Pending | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("VALIDATED"), Some(OrderStatus::Validated));
        assert_eq!(OrderStatus::parse("shipped"), None);
    }

    #[test]
    fn test_only_pending_is_editable() {
        assert!(OrderStatus::Pending.is_editable());
        assert!(!OrderStatus::Validated.is_editable());
        assert!(!OrderStatus::Invoiced.is_editable());
        assert!(!OrderStatus::Cancelled.is_editable());
    }

    #[test]
    fn test_deletable_statuses() {
        assert!(OrderStatus::Pending.is_deletable());
        assert!(OrderStatus::Cancelled.is_deletable());
        assert!(!OrderStatus::Validated.is_deletable());
        assert!(!OrderStatus::Invoiced.is_deletable());
    }

    #[test]
    fn test_display_and_label() {
        assert_eq!(OrderStatus::Invoiced.to_string(), "invoiced");
        assert_eq!(OrderStatus::Invoiced.label(), "Invoiced");
    }
}
