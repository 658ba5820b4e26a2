//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::invoice::InvoiceStatus;
use crate::order::OrderStatus;

use super::error::ReportError;

/// Inclusive date range a report covers. Open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// First day included.
    pub from: Option<NaiveDate>,
    /// Last day included.
    pub to: Option<NaiveDate>,
}

impl ReportPeriod {
    /// Builds a period, rejecting reversed bounds.
    ///
    /// # Errors
    /// * `InvalidDateRange` if `from` is after `to`
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, ReportError> {
        if let (Some(start), Some(end)) = (from, to) {
            if start > end {
                return Err(ReportError::InvalidDateRange { start, end });
            }
        }
        Ok(Self { from, to })
    }

    /// True if the day falls within the period.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }
}

/// Order row loaded for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRow {
    /// Order status.
    pub status: OrderStatus,
    /// Order total.
    pub total_amount: Decimal,
}

/// Invoice row loaded for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceRow {
    /// Invoice status.
    pub status: InvoiceStatus,
    /// Amount including tax.
    pub total_amount: Decimal,
    /// Payment due date.
    pub due_on: NaiveDate,
}

/// Count and amount for one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    /// Status key (e.g. "pending").
    pub status: String,
    /// Human label.
    pub label: String,
    /// Number of records.
    pub count: u64,
    /// Sum of their amounts.
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

/// Per-status counts, one entry for every status even when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    /// Entries in lifecycle order.
    pub entries: Vec<StatusCount>,
}

impl StatusBreakdown {
    /// Number of records across all statuses.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Entry for a status key.
    #[must_use]
    pub fn get(&self, status: &str) -> Option<&StatusCount> {
        self.entries.iter().find(|e| e.status == status)
    }
}

/// Sales overview for an account over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    /// Covered period.
    pub period: ReportPeriod,
    /// Orders per status.
    pub orders: StatusBreakdown,
    /// Invoices per status.
    pub invoices: StatusBreakdown,
    /// Total of all non-cancelled invoices.
    #[serde(with = "rust_decimal::serde::str")]
    pub invoiced_total: Decimal,
    /// Total of paid invoices.
    #[serde(with = "rust_decimal::serde::str")]
    pub paid_total: Decimal,
    /// Total of sent, unpaid invoices.
    #[serde(with = "rust_decimal::serde::str")]
    pub outstanding_total: Decimal,
    /// Sent invoices past their due date.
    pub overdue_count: u64,
}
