//! Order listing query.

use chrono::NaiveDate;
use orderdesk_core::order::OrderStatus;
use orderdesk_shared::types::PageRequest;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select};
use uuid::Uuid;

use super::{day_end_exclusive, day_start, ilike, non_blank};
use crate::entities::{orders, sea_orm_active_enums};

/// Filters for listing orders.
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    /// Only orders in this status.
    pub status: Option<OrderStatus>,
    /// Only orders of this customer.
    pub customer_id: Option<Uuid>,
    /// Matches the order reference.
    pub search: Option<String>,
    /// Created on or after this day.
    pub created_from: Option<NaiveDate>,
    /// Created on or before this day.
    pub created_to: Option<NaiveDate>,
    /// Requested page.
    pub page: PageRequest,
}

impl OrderQuery {
    /// Builds the select, newest first.
    #[must_use]
    pub fn select(&self, account_id: Uuid) -> Select<orders::Entity> {
        let mut select = orders::Entity::find().filter(orders::Column::AccountId.eq(account_id));

        if let Some(status) = self.status {
            select = select
                .filter(orders::Column::Status.eq(sea_orm_active_enums::OrderStatus::from(status)));
        }
        if let Some(customer_id) = self.customer_id {
            select = select.filter(orders::Column::CustomerId.eq(customer_id));
        }
        if let Some(term) = non_blank(self.search.as_ref()) {
            select = select.filter(ilike::<orders::Entity>(orders::Column::Reference, term));
        }
        if let Some(from) = self.created_from {
            select = select.filter(orders::Column::CreatedAt.gte(day_start(from)));
        }
        if let Some(to) = self.created_to {
            select = select.filter(orders::Column::CreatedAt.lt(day_end_exclusive(to)));
        }

        select
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_status_filter() {
        let query = OrderQuery {
            status: Some(OrderStatus::Validated),
            ..Default::default()
        };
        let sql = query
            .select(Uuid::nil())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains("validated"));
        assert!(sql.contains(r#"ORDER BY "orders"."created_at" DESC"#));
    }

    #[test]
    fn test_date_range_filter() {
        let query = OrderQuery {
            created_from: NaiveDate::from_ymd_opt(2026, 1, 1),
            created_to: NaiveDate::from_ymd_opt(2026, 1, 31),
            ..Default::default()
        };
        let sql = query
            .select(Uuid::nil())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""orders"."created_at" >= "#));
        assert!(sql.contains(r#""orders"."created_at" < "#));
        assert!(sql.contains("2026-02-01"));
    }
}
