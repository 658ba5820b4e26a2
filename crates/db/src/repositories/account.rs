//! Account (tenant) repository.
//!
//! Also hands out order and invoice sequence numbers under a row lock.

use chrono::Utc;
use orderdesk_core::{DomainError, DomainResult};
use orderdesk_shared::types::Currency;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::accounts;
use crate::error::map_db_err;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Display name.
    pub name: String,
    /// Globally unique slug.
    pub slug: String,
    /// Default currency of orders.
    pub currency: Currency,
    /// Default tax rate for invoices, as a fraction.
    pub default_tax_rate: Decimal,
    /// Invoice number prefix.
    pub invoice_prefix: String,
}

/// Input for updating account settings.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Display name.
    pub name: Option<String>,
    /// Default currency of new orders.
    pub currency: Option<Currency>,
    /// Default tax rate for new invoices.
    pub default_tax_rate: Option<Decimal>,
    /// Invoice number prefix for new invoices.
    pub invoice_prefix: Option<String>,
}

/// Which per-account sequence to advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    /// Order references.
    Order,
    /// Invoice numbers.
    Invoice,
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad settings, `Conflict` for a taken slug.
    pub async fn create(&self, input: CreateAccountInput) -> DomainResult<accounts::Model> {
        let name = required(&input.name, "name")?;
        let slug = validate_slug(&input.slug)?;
        validate_tax_rate(input.default_tax_rate)?;
        let prefix = validate_prefix(&input.invoice_prefix)?;

        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name),
            slug: Set(slug),
            currency: Set(input.currency.to_string()),
            default_tax_rate: Set(input.default_tax_rate),
            invoice_prefix: Set(prefix),
            next_order_number: Set(1),
            next_invoice_number: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        tracing::info!(account_id = %account.id, slug = %account.slug, "account created");
        Ok(account)
    }

    /// Finds an account by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    pub async fn find(&self, account_id: Uuid) -> DomainResult<accounts::Model> {
        accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(DomainError::not_found("account", account_id))
    }

    /// Updates account settings.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad settings, `NotFound` for unknown accounts.
    pub async fn update(
        &self,
        account_id: Uuid,
        input: UpdateAccountInput,
    ) -> DomainResult<accounts::Model> {
        let account = self.find(account_id).await?;
        let mut active: accounts::ActiveModel = account.into();

        if let Some(name) = input.name {
            active.name = Set(required(&name, "name")?);
        }
        if let Some(currency) = input.currency {
            active.currency = Set(currency.to_string());
        }
        if let Some(rate) = input.default_tax_rate {
            validate_tax_rate(rate)?;
            active.default_tax_rate = Set(rate);
        }
        if let Some(prefix) = input.invoice_prefix {
            active.invoice_prefix = Set(validate_prefix(&prefix)?);
        }

        if !active.is_changed() {
            return self.find(account_id).await;
        }

        active.update(&self.db).await.map_err(map_db_err)
    }

    /// Locks the account row and advances one of its sequences.
    ///
    /// Returns the locked account (before the increment) and the allocated
    /// number. Must run inside a transaction; the lock is held until commit.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    pub async fn allocate<C>(
        conn: &C,
        account_id: Uuid,
        sequence: Sequence,
    ) -> DomainResult<(accounts::Model, i64)>
    where
        C: ConnectionTrait,
    {
        let account = accounts::Entity::find_by_id(account_id)
            .lock_exclusive()
            .one(conn)
            .await
            .map_err(map_db_err)?
            .ok_or(DomainError::not_found("account", account_id))?;

        let mut active: accounts::ActiveModel = account.clone().into();
        let number = match sequence {
            Sequence::Order => {
                active.next_order_number = Set(account.next_order_number + 1);
                account.next_order_number
            }
            Sequence::Invoice => {
                active.next_invoice_number = Set(account.next_invoice_number + 1);
                account.next_invoice_number
            }
        };
        active.update(conn).await.map_err(map_db_err)?;

        tracing::debug!(account_id = %account_id, ?sequence, number, "sequence allocated");
        Ok((account, number))
    }
}

fn required(value: &str, field: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(DomainError::Validation(format!("{field} must not be blank")))
    } else {
        Ok(value.to_string())
    }
}

fn validate_slug(slug: &str) -> DomainResult<String> {
    let slug = slug.trim().to_lowercase();
    let valid = !slug.is_empty()
        && slug.len() <= 100
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(slug)
    } else {
        Err(DomainError::Validation(
            "slug may only contain lowercase letters, digits and dashes".to_string(),
        ))
    }
}

fn validate_tax_rate(rate: Decimal) -> DomainResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(DomainError::Validation(
            "tax rate must be between 0 and 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_prefix(prefix: &str) -> DomainResult<String> {
    let prefix = prefix.trim().to_uppercase();
    let valid = !prefix.is_empty()
        && prefix.len() <= 20
        && prefix.chars().all(|c| c.is_ascii_alphanumeric());
    if valid {
        Ok(prefix)
    } else {
        Err(DomainError::Validation(
            "invoice prefix must be 1-20 letters or digits".to_string(),
        ))
    }
}
