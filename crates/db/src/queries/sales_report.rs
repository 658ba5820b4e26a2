//! Sales report query.

use orderdesk_core::reports::ReportPeriod;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Select};
use uuid::Uuid;

use super::{day_end_exclusive, day_start};
use crate::entities::{invoices, orders};

/// Period selection for the sales report.
///
/// Orders are selected by creation day, invoices by issue date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesReportQuery {
    /// Covered period.
    pub period: ReportPeriod,
}

impl SalesReportQuery {
    /// Status and total of the account's orders in the period.
    #[must_use]
    pub fn orders_select(&self, account_id: Uuid) -> Select<orders::Entity> {
        let mut select = orders::Entity::find()
            .select_only()
            .column(orders::Column::Status)
            .column(orders::Column::TotalAmount)
            .filter(orders::Column::AccountId.eq(account_id));

        if let Some(from) = self.period.from {
            select = select.filter(orders::Column::CreatedAt.gte(day_start(from)));
        }
        if let Some(to) = self.period.to {
            select = select.filter(orders::Column::CreatedAt.lt(day_end_exclusive(to)));
        }
        select
    }

    /// Status, total and due date of the account's invoices in the period.
    #[must_use]
    pub fn invoices_select(&self, account_id: Uuid) -> Select<invoices::Entity> {
        let mut select = invoices::Entity::find()
            .select_only()
            .column(invoices::Column::Status)
            .column(invoices::Column::TotalAmount)
            .column(invoices::Column::DueOn)
            .filter(invoices::Column::AccountId.eq(account_id));

        if let Some(from) = self.period.from {
            select = select.filter(invoices::Column::IssuedOn.gte(from));
        }
        if let Some(to) = self.period.to {
            select = select.filter(invoices::Column::IssuedOn.lte(to));
        }
        select
    }
}
