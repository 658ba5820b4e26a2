use chrono::NaiveDate;
use orderdesk_core::invoice::{InvoiceStatus, is_overdue};
use orderdesk_db::entities::invoices;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::account::percent;
use super::{MoneyView, StatusView, optional_timestamp, timestamp};

/// An invoice with display amounts and overdue flag.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    /// Invoice ID.
    pub id: Uuid,
    /// Invoiced order.
    pub order_id: Uuid,
    /// Number, e.g. `INV-2026-00042`.
    pub number: String,
    /// Status with label.
    pub status: StatusView,
    /// Net amount.
    pub amount: MoneyView,
    /// Tax rate as a fraction.
    #[serde(with = "rust_decimal::serde::str")]
    pub tax_rate: Decimal,
    /// Tax rate as a percentage.
    pub tax_rate_display: String,
    /// Tax amount.
    pub tax_amount: MoneyView,
    /// Amount including tax.
    pub total_amount: MoneyView,
    /// Issue date.
    pub issued_on: NaiveDate,
    /// Due date.
    pub due_on: NaiveDate,
    /// Sent and past its due date.
    pub overdue: bool,
    /// Sent at timestamp.
    pub sent_at: Option<String>,
    /// Paid at timestamp.
    pub paid_at: Option<String>,
    /// Cancelled at timestamp.
    pub cancelled_at: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

impl InvoiceResponse {
    /// Presents an invoice, judging overdue against `today`.
    #[must_use]
    pub fn new(invoice: invoices::Model, today: NaiveDate) -> Self {
        let status = InvoiceStatus::from(invoice.status);
        Self {
            id: invoice.id,
            order_id: invoice.order_id,
            status: StatusView {
                value: status.as_str(),
                label: status.label(),
            },
            amount: MoneyView::new(invoice.amount, &invoice.currency),
            tax_rate: invoice.tax_rate,
            tax_rate_display: percent(invoice.tax_rate),
            tax_amount: MoneyView::new(invoice.tax_amount, &invoice.currency),
            total_amount: MoneyView::new(invoice.total_amount, &invoice.currency),
            issued_on: invoice.issued_on,
            due_on: invoice.due_on,
            overdue: is_overdue(status, invoice.due_on, today),
            sent_at: optional_timestamp(invoice.sent_at.as_ref()),
            paid_at: optional_timestamp(invoice.paid_at.as_ref()),
            cancelled_at: optional_timestamp(invoice.cancelled_at.as_ref()),
            created_at: timestamp(&invoice.created_at),
            number: invoice.number,
        }
    }
}
