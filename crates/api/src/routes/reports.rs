//! Report routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::NaiveDate;
use orderdesk_core::{DomainError, reports::ReportPeriod};
use serde::Deserialize;

use crate::{AppState, error::ApiResult, middleware::AuthUser, presenters::SalesSummaryResponse};
use orderdesk_db::{
    queries::SalesReportQuery,
    repositories::{AccountRepository, ReportRepository},
};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/sales", get(sales_report))
}

/// Query parameters for the sales report.
#[derive(Debug, Deserialize)]
pub struct SalesReportParams {
    /// First day included (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Last day included (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

/// GET `/reports/sales` - Orders and invoices per status with totals.
async fn sales_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SalesReportParams>,
) -> ApiResult<Json<SalesSummaryResponse>> {
    let period = ReportPeriod::new(params.from, params.to).map_err(DomainError::from)?;
    let account = AccountRepository::new(state.conn())
        .find(auth.account_id())
        .await?;
    let summary = ReportRepository::new(state.conn())
        .sales_summary(account.id, &SalesReportQuery { period })
        .await?;
    Ok(Json(SalesSummaryResponse::new(summary, &account.currency)))
}
