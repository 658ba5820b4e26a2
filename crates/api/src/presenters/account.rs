use orderdesk_db::entities::accounts;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::timestamp;

/// Account settings.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Unique slug.
    pub slug: String,
    /// Default order currency.
    pub currency: String,
    /// Default invoice tax rate.
    #[serde(with = "rust_decimal::serde::str")]
    pub default_tax_rate: Decimal,
    /// Tax rate as a percentage, e.g. `20%`.
    pub default_tax_rate_display: String,
    /// Invoice number prefix.
    pub invoice_prefix: String,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<accounts::Model> for AccountResponse {
    fn from(account: accounts::Model) -> Self {
        Self {
            id: account.id,
            default_tax_rate_display: percent(account.default_tax_rate),
            name: account.name,
            slug: account.slug,
            currency: account.currency,
            default_tax_rate: account.default_tax_rate,
            invoice_prefix: account.invoice_prefix,
            created_at: timestamp(&account.created_at),
            updated_at: timestamp(&account.updated_at),
        }
    }
}

/// Formats a fraction as a percentage without trailing zeros.
pub(crate) fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0.2000), "20%")]
    #[case(dec!(0.055), "5.5%")]
    #[case(dec!(0.0700), "7%")]
    #[case(Decimal::ZERO, "0%")]
    fn test_percent(#[case] rate: Decimal, #[case] expected: &str) {
        assert_eq!(percent(rate), expected);
    }
}
