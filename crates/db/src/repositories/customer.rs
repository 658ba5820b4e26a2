//! Customer repository.

use chrono::Utc;
use orderdesk_core::audit::AuditEntry;
use orderdesk_core::values::PersonName;
use orderdesk_core::{DomainError, DomainResult};
use orderdesk_shared::types::PageResponse;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::Actor;
use super::audit::AuditRepository;
use crate::entities::customers;
use crate::error::map_db_err;
use crate::queries::{CustomerQuery, fetch_page};

/// Input for creating a customer.
#[derive(Debug, Clone, Default)]
pub struct CreateCustomerInput {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address, stored lowercased.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Company name.
    pub company_name: Option<String>,
    /// Street address.
    pub address_line1: Option<String>,
    /// Address complement.
    pub address_line2: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// City.
    pub city: Option<String>,
    /// ISO 3166 alpha-2 country code.
    pub country: Option<String>,
}

/// Input for updating a customer. `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomerInput {
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<Option<String>>,
    /// Company name.
    pub company_name: Option<Option<String>>,
    /// Street address.
    pub address_line1: Option<Option<String>>,
    /// Address complement.
    pub address_line2: Option<Option<String>>,
    /// Postal code.
    pub postal_code: Option<Option<String>>,
    /// City.
    pub city: Option<Option<String>>,
    /// Country code.
    pub country: Option<Option<String>>,
}

/// Customer repository.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists customers of an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        account_id: Uuid,
        query: &CustomerQuery,
    ) -> DomainResult<PageResponse<customers::Model>> {
        fetch_page(&self.db, query.select(account_id), &query.page)
            .await
            .map_err(map_db_err)
    }

    /// Finds a customer of an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the customer does not belong to the account.
    pub async fn find(&self, account_id: Uuid, id: Uuid) -> DomainResult<customers::Model> {
        customers::Entity::find_by_id(id)
            .filter(customers::Column::AccountId.eq(account_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(DomainError::not_found("customer", id))
    }

    /// Creates a customer and records a `created` event.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for blank names or a bad email, `Conflict` if the
    /// email is already used in the account.
    pub async fn create(
        &self,
        actor: Actor,
        input: CreateCustomerInput,
    ) -> DomainResult<customers::Model> {
        let name = PersonName::new(&input.first_name, &input.last_name);
        ensure_named(&name)?;
        let email = normalize_email(&input.email)?;

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let now = Utc::now().into();
        let customer = customers::ActiveModel {
            id: Set(Uuid::now_v7()),
            account_id: Set(actor.account_id),
            first_name: Set(name.first),
            last_name: Set(name.last),
            email: Set(email),
            phone: Set(clean(input.phone)),
            company_name: Set(clean(input.company_name)),
            address_line1: Set(clean(input.address_line1)),
            address_line2: Set(clean(input.address_line2)),
            postal_code: Set(clean(input.postal_code)),
            city: Set(clean(input.city)),
            country: Set(normalize_country(input.country)?),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        AuditRepository::record(&txn, actor, &customer, vec![AuditEntry::created(&customer)])
            .await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(customer_id = %customer.id, "customer created");
        Ok(customer)
    }

    /// Updates a customer and records one event per changed tracked field.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Validation` or `Conflict`.
    pub async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        input: UpdateCustomerInput,
    ) -> DomainResult<customers::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let before = find_locked(&txn, actor.account_id, id).await?;

        let name = PersonName::new(
            input.first_name.as_deref().unwrap_or(&before.first_name),
            input.last_name.as_deref().unwrap_or(&before.last_name),
        );
        ensure_named(&name)?;

        let mut active: customers::ActiveModel = before.clone().into();
        active.first_name = Set(name.first);
        active.last_name = Set(name.last);
        if let Some(email) = input.email {
            active.email = Set(normalize_email(&email)?);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(clean(phone));
        }
        if let Some(company_name) = input.company_name {
            active.company_name = Set(clean(company_name));
        }
        if let Some(line1) = input.address_line1 {
            active.address_line1 = Set(clean(line1));
        }
        if let Some(line2) = input.address_line2 {
            active.address_line2 = Set(clean(line2));
        }
        if let Some(postal_code) = input.postal_code {
            active.postal_code = Set(clean(postal_code));
        }
        if let Some(city) = input.city {
            active.city = Set(clean(city));
        }
        if let Some(country) = input.country {
            active.country = Set(normalize_country(country)?);
        }

        let after = active.update(&txn).await.map_err(map_db_err)?;
        AuditRepository::record(&txn, actor, &after, AuditEntry::updated(&before, &after)).await?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(after)
    }

    /// Deletes a customer. Their orders keep existing without a customer.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the customer does not belong to the account.
    pub async fn delete(&self, actor: Actor, id: Uuid) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let customer = find_locked(&txn, actor.account_id, id).await?;

        AuditRepository::record(&txn, actor, &customer, vec![AuditEntry::deleted(&customer)])
            .await?;
        customer.delete(&txn).await.map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(customer_id = %id, "customer deleted");
        Ok(())
    }
}

/// Loads a customer of an account with `FOR UPDATE`.
async fn find_locked<C>(conn: &C, account_id: Uuid, id: Uuid) -> DomainResult<customers::Model>
where
    C: ConnectionTrait,
{
    customers::Entity::find_by_id(id)
        .filter(customers::Column::AccountId.eq(account_id))
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or(DomainError::not_found("customer", id))
}

fn ensure_named(name: &PersonName) -> DomainResult<()> {
    if name.is_blank() {
        Err(DomainError::Validation(
            "first name or last name is required".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Trims and lowercases an email, with a minimal shape check.
pub(crate) fn normalize_email(email: &str) -> DomainResult<String> {
    let email = email.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        })
        && !email.contains(char::is_whitespace);
    if valid {
        Ok(email)
    } else {
        Err(DomainError::Validation(format!("invalid email: {email}")))
    }
}

fn normalize_country(country: Option<String>) -> DomainResult<Option<String>> {
    match clean(country) {
        None => Ok(None),
        Some(code) if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) => {
            Ok(Some(code.to_uppercase()))
        }
        Some(code) => Err(DomainError::Validation(format!(
            "country must be an ISO 3166 alpha-2 code, got {code}"
        ))),
    }
}

/// Trims a value, turning blanks into `None`.
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Jane.Doe@Example.COM ").unwrap(),
            "jane.doe@example.com"
        );
        assert!(normalize_email("jane").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("jane@localhost").is_err());
        assert!(normalize_email("ja ne@example.com").is_err());
    }

    #[test]
    fn test_normalize_country() {
        assert_eq!(normalize_country(Some("fr".into())).unwrap(), Some("FR".into()));
        assert_eq!(normalize_country(Some(" ".into())).unwrap(), None);
        assert!(normalize_country(Some("FRA".into())).is_err());
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean(Some("  x ".into())), Some("x".into()));
        assert_eq!(clean(Some(String::new())), None);
        assert_eq!(clean(None), None);
    }

    #[test]
    fn test_ensure_named() {
        assert!(ensure_named(&PersonName::new("", "")).is_err());
        assert!(ensure_named(&PersonName::new("Jane", "")).is_ok());
    }
}
