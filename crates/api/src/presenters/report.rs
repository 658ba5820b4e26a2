use chrono::NaiveDate;
use orderdesk_core::reports::{SalesSummary, StatusBreakdown};
use serde::Serialize;

use super::MoneyView;

/// One status row of a breakdown.
#[derive(Debug, Serialize)]
pub struct StatusRow {
    /// Status value.
    pub status: String,
    /// Status label.
    pub label: String,
    /// Number of records.
    pub count: u64,
    /// Sum of their totals.
    pub total: MoneyView,
}

/// Sales overview.
#[derive(Debug, Serialize)]
pub struct SalesSummaryResponse {
    /// First day included.
    pub from: Option<NaiveDate>,
    /// Last day included.
    pub to: Option<NaiveDate>,
    /// Orders per status.
    pub orders: Vec<StatusRow>,
    /// Invoices per status.
    pub invoices: Vec<StatusRow>,
    /// Total of all non-cancelled invoices.
    pub invoiced_total: MoneyView,
    /// Total of paid invoices.
    pub paid_total: MoneyView,
    /// Total of sent, unpaid invoices.
    pub outstanding_total: MoneyView,
    /// Sent invoices past their due date.
    pub overdue_count: u64,
}

impl SalesSummaryResponse {
    /// Presents a summary in the account currency.
    #[must_use]
    pub fn new(summary: SalesSummary, currency: &str) -> Self {
        Self {
            from: summary.period.from,
            to: summary.period.to,
            orders: rows(summary.orders, currency),
            invoices: rows(summary.invoices, currency),
            invoiced_total: MoneyView::new(summary.invoiced_total, currency),
            paid_total: MoneyView::new(summary.paid_total, currency),
            outstanding_total: MoneyView::new(summary.outstanding_total, currency),
            overdue_count: summary.overdue_count,
        }
    }
}

fn rows(breakdown: StatusBreakdown, currency: &str) -> Vec<StatusRow> {
    breakdown
        .entries
        .into_iter()
        .map(|entry| StatusRow {
            total: MoneyView::new(entry.total, currency),
            status: entry.status,
            label: entry.label,
            count: entry.count,
        })
        .collect()
}
