//! Report repository: loads rows for the core report aggregation.

use chrono::{NaiveDate, Utc};
use orderdesk_core::DomainResult;
use orderdesk_core::reports::{InvoiceRow, OrderRow, ReportService, SalesSummary};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{InvoiceStatus, OrderStatus};
use crate::error::map_db_err;
use crate::queries::SalesReportQuery;

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sales summary of an account over the query period.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn sales_summary(
        &self,
        account_id: Uuid,
        query: &SalesReportQuery,
    ) -> DomainResult<SalesSummary> {
        let orders: Vec<OrderRow> = query
            .orders_select(account_id)
            .into_tuple::<(OrderStatus, Decimal)>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|(status, total_amount)| OrderRow {
                status: status.into(),
                total_amount,
            })
            .collect();

        let invoices: Vec<InvoiceRow> = query
            .invoices_select(account_id)
            .into_tuple::<(InvoiceStatus, Decimal, NaiveDate)>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|(status, total_amount, due_on)| InvoiceRow {
                status: status.into(),
                total_amount,
                due_on,
            })
            .collect();

        tracing::debug!(
            account_id = %account_id,
            orders = orders.len(),
            invoices = invoices.len(),
            "building sales summary"
        );

        Ok(ReportService::sales_summary(
            query.period,
            &orders,
            &invoices,
            Utc::now().date_naive(),
        ))
    }
}
