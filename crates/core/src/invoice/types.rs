//! Invoice domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Invoice status.
///
/// Valid transitions:
/// - Draft → Sent (send)
/// - Sent → Paid (mark as paid)
/// - Draft | Sent → Cancelled (cancel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Invoice issued but not yet sent to the customer.
    Draft,
    /// Invoice sent; awaiting payment.
    Sent,
    /// Payment received (terminal).
    Paid,
    /// Invoice cancelled (terminal).
    Cancelled,
}

impl InvoiceStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Draft, Self::Sent, Self::Paid, Self::Cancelled];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "paid" => Some(Self::Paid),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Sent => "Sent",
            Self::Paid => "Paid",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Returns true while the invoice still binds its order (draft or sent).
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Draft | Self::Sent)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
