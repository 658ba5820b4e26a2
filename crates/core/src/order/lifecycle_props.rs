//! Property-based tests for order transitions and totals.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::error::DomainError;
use crate::fulfillment::FulfillmentStatus;
use crate::invoice::InvoiceStatus;
use crate::order::lifecycle::OrderLifecycle;
use crate::order::lines::{line_total, max_amount, order_total, validate_line};
use crate::order::types::OrderStatus;

fn arb_order_status() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just(OrderStatus::Pending),
        Just(OrderStatus::Validated),
        Just(OrderStatus::Invoiced),
        Just(OrderStatus::Cancelled),
    ]
}

fn arb_invoice_status() -> impl Strategy<Value = Option<InvoiceStatus>> {
    prop_oneof![
        Just(None),
        Just(Some(InvoiceStatus::Draft)),
        Just(Some(InvoiceStatus::Sent)),
        Just(Some(InvoiceStatus::Paid)),
        Just(Some(InvoiceStatus::Cancelled)),
    ]
}

fn arb_fulfillment_status() -> impl Strategy<Value = FulfillmentStatus> {
    prop_oneof![
        Just(FulfillmentStatus::Pending),
        Just(FulfillmentStatus::Processing),
        Just(FulfillmentStatus::Shipped),
        Just(FulfillmentStatus::Delivered),
        Just(FulfillmentStatus::Cancelled),
    ]
}

/// Prices with two decimals between 0.00 and 10,000.00.
fn arb_price() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every successful action lands on a status reachable from the source.
    #[test]
    fn prop_successful_actions_follow_transition_table(
        status in arb_order_status(),
        lines in 0usize..5,
    ) {
        if let Ok(action) = OrderLifecycle::validate(status, lines) {
            prop_assert!(OrderLifecycle::is_valid_transition(status, action.new_status()));
        }
        if let Ok(action) = OrderLifecycle::invoice(status) {
            prop_assert!(OrderLifecycle::is_valid_transition(status, action.new_status()));
        }
        if let Ok(action) = OrderLifecycle::revert_invoice(status) {
            prop_assert!(OrderLifecycle::is_valid_transition(status, action.new_status()));
        }
    }

    /// Cancellation succeeds exactly when nothing blocks it.
    #[test]
    fn prop_cancel_blockers(
        status in arb_order_status(),
        invoice in arb_invoice_status(),
        fulfillments in prop::collection::vec(arb_fulfillment_status(), 0..4),
    ) {
        let result = OrderLifecycle::cancel(status, invoice, &fulfillments, None);
        let shipped = fulfillments.iter().any(FulfillmentStatus::has_shipped);
        let paid = status == OrderStatus::Invoiced && invoice == Some(InvoiceStatus::Paid);

        match result {
            Ok(plan) => {
                prop_assert!(status != OrderStatus::Cancelled && !shipped && !paid);
                prop_assert_eq!(plan.new_status, OrderStatus::Cancelled);
                prop_assert_eq!(
                    plan.cancel_invoice,
                    status == OrderStatus::Invoiced && invoice.is_some_and(|i| i.is_open())
                );
            }
            Err(DomainError::AlreadyCancelled { .. }) => {
                prop_assert_eq!(status, OrderStatus::Cancelled);
            }
            Err(DomainError::ShipmentInProgress) => prop_assert!(shipped),
            Err(DomainError::InvoiceAlreadyPaid) => prop_assert!(paid),
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    /// The order total always equals the sum of quantity × unit price.
    #[test]
    fn prop_order_total_is_sum_of_lines(
        lines in prop::collection::vec((1i32..100, arb_price()), 0..20)
    ) {
        let totals: Vec<Decimal> = lines
            .iter()
            .map(|(q, p)| line_total(*q, *p).unwrap())
            .collect();
        let total = order_total(totals).unwrap();
        let expected: Decimal = lines.iter().map(|(q, p)| Decimal::from(*q) * *p).sum();
        prop_assert_eq!(total, expected);
    }

    /// Arbitrary input never panics; accepted lines always fit the column.
    #[test]
    fn prop_line_total_is_bounded(
        quantity in any::<i32>(),
        mantissa in any::<i64>(),
        scale in 0u32..6,
    ) {
        let price = Decimal::new(mantissa, scale);
        if let Ok(total) = line_total(quantity, price) {
            prop_assert!(total <= max_amount());
        }
        if validate_line(quantity, price).is_ok() {
            prop_assert!(price.normalize().scale() <= 2);
            prop_assert!(price <= max_amount());
        }
    }
}
