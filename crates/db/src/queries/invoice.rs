//! Invoice listing query.

use chrono::NaiveDate;
use orderdesk_core::invoice::InvoiceStatus;
use orderdesk_shared::types::PageRequest;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select};
use uuid::Uuid;

use crate::entities::{invoices, sea_orm_active_enums};

/// Filters for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceQuery {
    /// Only invoices in this status.
    pub status: Option<InvoiceStatus>,
    /// Only invoices of this order.
    pub order_id: Option<Uuid>,
    /// Only sent invoices due before this day.
    pub overdue_on: Option<NaiveDate>,
    /// Issued on or after this day.
    pub issued_from: Option<NaiveDate>,
    /// Issued on or before this day.
    pub issued_to: Option<NaiveDate>,
    /// Requested page.
    pub page: PageRequest,
}

impl InvoiceQuery {
    /// Builds the select, most recently issued first.
    #[must_use]
    pub fn select(&self, account_id: Uuid) -> Select<invoices::Entity> {
        let mut select =
            invoices::Entity::find().filter(invoices::Column::AccountId.eq(account_id));

        if let Some(status) = self.status {
            select = select.filter(
                invoices::Column::Status.eq(sea_orm_active_enums::InvoiceStatus::from(status)),
            );
        }
        if let Some(order_id) = self.order_id {
            select = select.filter(invoices::Column::OrderId.eq(order_id));
        }
        if let Some(today) = self.overdue_on {
            select = select
                .filter(invoices::Column::Status.eq(sea_orm_active_enums::InvoiceStatus::Sent))
                .filter(invoices::Column::DueOn.lt(today));
        }
        if let Some(from) = self.issued_from {
            select = select.filter(invoices::Column::IssuedOn.gte(from));
        }
        if let Some(to) = self.issued_to {
            select = select.filter(invoices::Column::IssuedOn.lte(to));
        }

        select
            .order_by_desc(invoices::Column::IssuedOn)
            .order_by_desc(invoices::Column::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_overdue_filter() {
        let query = InvoiceQuery {
            overdue_on: NaiveDate::from_ymd_opt(2026, 4, 1),
            ..Default::default()
        };
        let sql = query
            .select(Uuid::nil())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains("sent"));
        assert!(sql.contains(r#""invoices"."due_on" < '2026-04-01'"#));
    }
}
