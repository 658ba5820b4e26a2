//! Order line arithmetic and order references.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{DomainError, DomainResult};

/// Largest quantity accepted on a single line.
pub const MAX_LINE_QUANTITY: i32 = 1_000_000;

/// Largest amount a `NUMERIC(14,2)` column holds.
#[must_use]
pub fn max_amount() -> Decimal {
    Decimal::new(99_999_999_999_999, 2)
}

/// Checks quantity and unit price of a line.
///
/// # Errors
/// * `Validation` if quantity is not positive, the price is negative, has
///   more than two decimals or exceeds [`max_amount`]
pub fn validate_line(quantity: i32, unit_price: Decimal) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::Validation(
            "quantity must be greater than zero".to_string(),
        ));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(DomainError::Validation(format!(
            "quantity must not exceed {MAX_LINE_QUANTITY}"
        )));
    }
    if unit_price.is_sign_negative() && !unit_price.is_zero() {
        return Err(DomainError::Validation(
            "unit price must not be negative".to_string(),
        ));
    }
    if unit_price.normalize().scale() > 2 {
        return Err(DomainError::Validation(
            "unit price must not have more than two decimals".to_string(),
        ));
    }
    if unit_price > max_amount() {
        return Err(DomainError::Validation(format!(
            "unit price must not exceed {}",
            max_amount()
        )));
    }
    Ok(())
}

fn ensure_storable(amount: Decimal, what: &str) -> DomainResult<Decimal> {
    if amount > max_amount() {
        Err(DomainError::Validation(format!(
            "{what} must not exceed {}",
            max_amount()
        )))
    } else {
        Ok(amount)
    }
}

/// Rounds an amount to cents, midpoint away from zero.
#[must_use]
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `quantity × unit_price`, rounded to cents.
///
/// # Errors
/// * `Validation` if the product overflows or exceeds [`max_amount`]
pub fn line_total(quantity: i32, unit_price: Decimal) -> DomainResult<Decimal> {
    let total = Decimal::from(quantity)
        .checked_mul(unit_price)
        .map(round_amount)
        .unwrap_or(Decimal::MAX);
    ensure_storable(total, "line total")
}

/// Sum of line totals.
///
/// # Errors
/// * `Validation` if the sum overflows or exceeds [`max_amount`]
pub fn order_total<I>(line_totals: I) -> DomainResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    let total = line_totals
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
        .unwrap_or(Decimal::MAX);
    ensure_storable(total, "order total")
}

/// Formats the sequential order reference, e.g. `ORD-000042`.
#[must_use]
pub fn format_order_reference(sequence: i64) -> String {
    format!("ORD-{sequence:06}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(3, dec!(19.99)).unwrap(), dec!(59.97));
        assert_eq!(line_total(1, dec!(0)).unwrap(), dec!(0));
        assert_eq!(line_total(2, dec!(0.005)).unwrap(), dec!(0.01));
    }

    #[test]
    fn test_line_total_overflow_is_rejected() {
        assert!(matches!(
            line_total(10, Decimal::MAX / dec!(2)),
            Err(DomainError::Validation(_))
        ));
        assert!(line_total(MAX_LINE_QUANTITY, dec!(10_000_000)).is_err());
        assert_eq!(line_total(1, max_amount()).unwrap(), max_amount());
    }

    #[test]
    fn test_order_total() {
        let totals = vec![
            line_total(2, dec!(10)).unwrap(),
            line_total(1, dec!(5.50)).unwrap(),
        ];
        assert_eq!(order_total(totals).unwrap(), dec!(25.50));
        assert_eq!(order_total(Vec::new()).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_order_total_overflow_is_rejected() {
        assert!(order_total(vec![max_amount(), dec!(0.01)]).is_err());
        assert!(order_total(vec![Decimal::MAX, Decimal::MAX]).is_err());
    }

    #[test]
    fn test_validate_line() {
        assert!(validate_line(1, dec!(10)).is_ok());
        assert!(validate_line(5, Decimal::ZERO).is_ok());
        assert!(matches!(
            validate_line(0, dec!(10)),
            Err(DomainError::Validation(_))
        ));
        assert!(validate_line(-2, dec!(10)).is_err());
        assert!(validate_line(1, dec!(-0.01)).is_err());
        assert!(validate_line(MAX_LINE_QUANTITY + 1, dec!(1)).is_err());
    }

    #[test]
    fn test_validate_line_rejects_unstorable_prices() {
        assert!(matches!(
            validate_line(3, dec!(0.005)),
            Err(DomainError::Validation(_))
        ));
        assert!(validate_line(1, dec!(10.500)).is_ok());
        assert!(validate_line(1, max_amount()).is_ok());
        assert!(validate_line(1, max_amount() + dec!(0.01)).is_err());
        assert!(validate_line(1, Decimal::MAX / dec!(2)).is_err());
    }

    #[test]
    fn test_format_order_reference() {
        assert_eq!(format_order_reference(1), "ORD-000001");
        assert_eq!(format_order_reference(42), "ORD-000042");
        assert_eq!(format_order_reference(1_234_567), "ORD-1234567");
    }
}
