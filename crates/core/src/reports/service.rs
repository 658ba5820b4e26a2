//! Report aggregation.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::invoice::{InvoiceStatus, is_overdue};
use crate::order::OrderStatus;

use super::types::{
    InvoiceRow, OrderRow, ReportPeriod, SalesSummary, StatusBreakdown, StatusCount,
};

/// Builds reports from plain rows.
pub struct ReportService;

impl ReportService {
    /// Counts orders per status.
    #[must_use]
    pub fn order_breakdown(orders: &[OrderRow]) -> StatusBreakdown {
        StatusBreakdown {
            entries: OrderStatus::ALL
                .iter()
                .map(|status| {
                    Self::tally(
                        status.as_str(),
                        status.label(),
                        orders
                            .iter()
                            .filter(|o| o.status == *status)
                            .map(|o| o.total_amount),
                    )
                })
                .collect(),
        }
    }

    /// Counts invoices per status.
    #[must_use]
    pub fn invoice_breakdown(invoices: &[InvoiceRow]) -> StatusBreakdown {
        StatusBreakdown {
            entries: InvoiceStatus::ALL
                .iter()
                .map(|status| {
                    Self::tally(
                        status.as_str(),
                        status.label(),
                        invoices
                            .iter()
                            .filter(|i| i.status == *status)
                            .map(|i| i.total_amount),
                    )
                })
                .collect(),
        }
    }

    /// Generates the sales summary.
    ///
    /// `today` decides which sent invoices are overdue.
    #[must_use]
    pub fn sales_summary(
        period: ReportPeriod,
        orders: &[OrderRow],
        invoices: &[InvoiceRow],
        today: NaiveDate,
    ) -> SalesSummary {
        let sum_where = |pred: fn(InvoiceStatus) -> bool| -> Decimal {
            invoices
                .iter()
                .filter(|i| pred(i.status))
                .map(|i| i.total_amount)
                .sum()
        };

        SalesSummary {
            period,
            orders: Self::order_breakdown(orders),
            invoices: Self::invoice_breakdown(invoices),
            invoiced_total: sum_where(|s| s != InvoiceStatus::Cancelled),
            paid_total: sum_where(|s| s == InvoiceStatus::Paid),
            outstanding_total: sum_where(|s| s == InvoiceStatus::Sent),
            overdue_count: invoices
                .iter()
                .filter(|i| is_overdue(i.status, i.due_on, today))
                .count() as u64,
        }
    }

    fn tally(
        status: &str,
        label: &str,
        amounts: impl Iterator<Item = Decimal>,
    ) -> StatusCount {
        let (count, total) = amounts.fold((0_u64, Decimal::ZERO), |(n, sum), amount| {
            (n + 1, sum + amount)
        });
        StatusCount {
            status: status.to_string(),
            label: label.to_string(),
            count,
            total,
        }
    }
}
