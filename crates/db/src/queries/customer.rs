//! Customer listing query.

use orderdesk_shared::types::PageRequest;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Select};
use uuid::Uuid;

use super::{ilike, non_blank};
use crate::entities::customers;

/// Filters for listing customers.
#[derive(Debug, Clone, Default)]
pub struct CustomerQuery {
    /// Matches first name, last name, email or company.
    pub search: Option<String>,
    /// ISO 3166 alpha-2 country code.
    pub country: Option<String>,
    /// Requested page.
    pub page: PageRequest,
}

impl CustomerQuery {
    /// Builds the select, sorted by last name then first name.
    #[must_use]
    pub fn select(&self, account_id: Uuid) -> Select<customers::Entity> {
        let mut select =
            customers::Entity::find().filter(customers::Column::AccountId.eq(account_id));

        if let Some(term) = non_blank(self.search.as_ref()) {
            select = select.filter(
                Condition::any()
                    .add(ilike::<customers::Entity>(customers::Column::FirstName, term))
                    .add(ilike::<customers::Entity>(customers::Column::LastName, term))
                    .add(ilike::<customers::Entity>(customers::Column::Email, term))
                    .add(ilike::<customers::Entity>(
                        customers::Column::CompanyName,
                        term,
                    )),
            );
        }

        if let Some(country) = non_blank(self.country.as_ref()) {
            select = select.filter(customers::Column::Country.eq(country.to_uppercase()));
        }

        select
            .order_by_asc(customers::Column::LastName)
            .order_by_asc(customers::Column::FirstName)
            .order_by_asc(customers::Column::Id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_select_is_scoped_and_filtered() {
        let query = CustomerQuery {
            search: Some("Acme".to_string()),
            country: Some("fr".to_string()),
            ..Default::default()
        };
        let sql = query
            .select(Uuid::nil())
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""customers"."account_id" = '00000000-0000-0000-0000-000000000000'"#));
        assert!(sql.contains("LOWER"));
        assert!(sql.contains("'%acme%'"));
        assert!(sql.contains(r#""customers"."country" = 'FR'"#));
        assert!(sql.contains("ORDER BY"));
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = CustomerQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        let sql = query
            .select(Uuid::nil())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(!sql.contains("LIKE"));
    }
}
