//! Tests for report aggregation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::ReportService;
use super::types::{InvoiceRow, OrderRow, ReportPeriod};
use crate::invoice::InvoiceStatus;
use crate::order::OrderStatus;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn invoice(status: InvoiceStatus, total: Decimal, due: u32) -> InvoiceRow {
    InvoiceRow {
        status,
        total_amount: total,
        due_on: day(due),
    }
}

#[test]
fn test_breakdown_lists_every_status() {
    let breakdown = ReportService::order_breakdown(&[]);
    assert_eq!(breakdown.entries.len(), OrderStatus::ALL.len());
    assert_eq!(breakdown.total_count(), 0);
    assert_eq!(breakdown.get("pending").unwrap().label, "Pending");
}

#[test]
fn test_sales_summary_totals() {
    let orders = [
        OrderRow {
            status: OrderStatus::Pending,
            total_amount: dec!(10),
        },
        OrderRow {
            status: OrderStatus::Invoiced,
            total_amount: dec!(100),
        },
        OrderRow {
            status: OrderStatus::Invoiced,
            total_amount: dec!(50),
        },
    ];
    let invoices = [
        invoice(InvoiceStatus::Sent, dec!(120), 1),
        invoice(InvoiceStatus::Sent, dec!(60), 30),
        invoice(InvoiceStatus::Paid, dec!(24), 1),
        invoice(InvoiceStatus::Cancelled, dec!(999), 1),
        invoice(InvoiceStatus::Draft, dec!(12), 1),
    ];

    let summary =
        ReportService::sales_summary(ReportPeriod::default(), &orders, &invoices, day(15));

    let invoiced = summary.orders.get("invoiced").unwrap();
    assert_eq!(invoiced.count, 2);
    assert_eq!(invoiced.total, dec!(150));
    assert_eq!(summary.invoiced_total, dec!(216));
    assert_eq!(summary.paid_total, dec!(24));
    assert_eq!(summary.outstanding_total, dec!(180));
    assert_eq!(summary.overdue_count, 1);
    assert_eq!(summary.invoices.get("cancelled").unwrap().count, 1);
}

#[test]
fn test_period_rejects_reversed_range() {
    assert!(ReportPeriod::new(Some(day(10)), Some(day(1))).is_err());
    let period = ReportPeriod::new(Some(day(1)), Some(day(10))).unwrap();
    assert!(period.contains(day(1)));
    assert!(period.contains(day(10)));
    assert!(!period.contains(day(11)));
    assert!(ReportPeriod::default().contains(day(20)));
}

fn order_status() -> impl Strategy<Value = OrderStatus> {
    prop::sample::select(OrderStatus::ALL.to_vec())
}

proptest! {
    /// Breakdown counts and totals add up to the input rows.
    #[test]
    fn prop_breakdown_preserves_totals(
        rows in prop::collection::vec((order_status(), 0i64..1_000_000), 0..50)
    ) {
        let orders: Vec<OrderRow> = rows
            .iter()
            .map(|(status, cents)| OrderRow {
                status: *status,
                total_amount: Decimal::new(*cents, 2),
            })
            .collect();

        let breakdown = ReportService::order_breakdown(&orders);
        let expected: Decimal = orders.iter().map(|o| o.total_amount).sum();
        let actual: Decimal = breakdown.entries.iter().map(|e| e.total).sum();

        prop_assert_eq!(breakdown.total_count(), orders.len() as u64);
        prop_assert_eq!(actual, expected);
    }
}
