//! Presenters turning database rows into response bodies.
//!
//! Responses carry raw values plus display fields: formatted money,
//! status labels and full names.

mod account;
mod customer;
mod event;
mod fulfillment;
mod invoice;
mod order;
mod report;

pub use account::AccountResponse;
pub use customer::CustomerResponse;
pub use event::EventResponse;
pub use fulfillment::{FulfillmentResponse, FulfillmentServiceResponse};
pub use invoice::InvoiceResponse;
pub use order::{OrderLineResponse, OrderResponse};
pub use report::SalesSummaryResponse;

use chrono::{DateTime, FixedOffset};
use orderdesk_shared::types::{Currency, Money};
use rust_decimal::Decimal;
use serde::Serialize;

/// An amount with its currency and display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoneyView {
    /// Amount as a decimal string.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// ISO 4217 code.
    pub currency: String,
    /// e.g. `€1,234.50`.
    pub formatted: String,
}

impl MoneyView {
    /// Presents an amount in the given currency code.
    ///
    /// Codes without a known symbol are formatted as `1234.50 XYZ`.
    #[must_use]
    pub fn new(amount: Decimal, currency: &str) -> Self {
        let formatted = match currency.parse::<Currency>() {
            Ok(known) => Money::new(amount, known).format(),
            Err(_) => format!("{amount} {currency}"),
        };
        Self {
            amount,
            currency: currency.to_string(),
            formatted,
        }
    }
}

/// A status with its human readable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    /// Machine value, e.g. `validated`.
    pub value: &'static str,
    /// Display label, e.g. `Validated`.
    pub label: &'static str,
}

pub(crate) fn timestamp(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339()
}

pub(crate) fn optional_timestamp(value: Option<&DateTime<FixedOffset>>) -> Option<String> {
    value.map(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_view_formats_known_currency() {
        let view = MoneyView::new(dec!(1234.5), "EUR");
        assert_eq!(view.formatted, "€1,234.50");
        assert_eq!(view.currency, "EUR");
    }

    #[test]
    fn test_money_view_falls_back_for_unknown_currency() {
        let view = MoneyView::new(dec!(12.00), "XYZ");
        assert_eq!(view.formatted, "12.00 XYZ");
    }

    #[test]
    fn test_money_view_serializes_amount_as_string() {
        let json = serde_json::to_value(MoneyView::new(dec!(7.50), "USD")).unwrap();
        assert_eq!(json["amount"], "7.50");
        assert_eq!(json["formatted"], "$7.50");
    }
}
