//! Invoice amounts, numbering and due dates.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::invoice::types::InvoiceStatus;
use crate::order::{max_amount, round_amount};

/// Derived invoice amounts: `total = amount + tax`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Net amount (order total).
    pub amount: Decimal,
    /// Tax rate as a fraction (0.2 = 20%).
    pub tax_rate: Decimal,
    /// `round2(amount × tax_rate)`.
    pub tax_amount: Decimal,
    /// `amount + tax_amount`.
    pub total_amount: Decimal,
}

impl InvoiceTotals {
    /// Computes tax and total for a net amount.
    ///
    /// # Errors
    /// * `Validation` if the amount is negative or the rate is outside `[0, 1]`
    pub fn compute(amount: Decimal, tax_rate: Decimal) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::Validation(
                "invoice amount must not be negative".to_string(),
            ));
        }
        if tax_rate < Decimal::ZERO || tax_rate > Decimal::ONE {
            return Err(DomainError::Validation(
                "tax rate must be between 0 and 1".to_string(),
            ));
        }

        let amount = round_amount(amount);
        let total = amount
            .checked_mul(tax_rate)
            .map(round_amount)
            .and_then(|tax| amount.checked_add(tax).map(|total| (tax, total)));
        match total {
            Some((tax_amount, total_amount)) if total_amount <= max_amount() => Ok(Self {
                amount,
                tax_rate,
                tax_amount,
                total_amount,
            }),
            _ => Err(DomainError::Validation(format!(
                "invoice total must not exceed {}",
                max_amount()
            ))),
        }
    }
}

/// Formats an invoice number, e.g. `INV-2026-00042`.
#[must_use]
pub fn format_invoice_number(prefix: &str, year: i32, sequence: i64) -> String {
    format!("{prefix}-{year}-{sequence:05}")
}

/// Due date `days` after the issue date.
///
/// # Errors
/// * `Validation` if the date overflows the calendar
pub fn due_date(issued_on: NaiveDate, days: u32) -> DomainResult<NaiveDate> {
    issued_on
        .checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| DomainError::Validation("due date out of range".to_string()))
}

/// A sent invoice past its due date.
#[must_use]
pub fn is_overdue(status: InvoiceStatus, due_on: NaiveDate, today: NaiveDate) -> bool {
    status == InvoiceStatus::Sent && due_on < today
}
