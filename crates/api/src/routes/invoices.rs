//! Invoice routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use orderdesk_core::invoice::InvoiceStatus;
use orderdesk_shared::types::PageResponse;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{page_request, parse_filter};
use crate::{
    AppState,
    error::ApiResult,
    extractors::ValidatedJson,
    middleware::AuthUser,
    presenters::InvoiceResponse,
};
use orderdesk_db::{queries::InvoiceQuery, repositories::InvoiceRepository};

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices/{id}", get(get_invoice).patch(reschedule_invoice))
        .route("/invoices/{id}/send", post(send_invoice))
        .route("/invoices/{id}/pay", post(pay_invoice))
        .route("/invoices/{id}/cancel", post(cancel_invoice))
}

/// Query parameters for listing invoices.
#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    /// Status filter.
    pub status: Option<String>,
    /// Invoices of one order.
    pub order_id: Option<Uuid>,
    /// Only sent invoices past their due date.
    #[serde(default)]
    pub overdue: bool,
    /// Issued on or after (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Issued on or before (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default 20, max 100).
    pub per_page: Option<u32>,
}

/// Request body for moving the due date.
#[derive(Debug, Deserialize, Validate)]
pub struct RescheduleInvoiceRequest {
    /// New due date (YYYY-MM-DD).
    pub due_on: NaiveDate,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// GET `/invoices` - List invoices with filters.
async fn list_invoices(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListInvoicesQuery>,
) -> ApiResult<Json<PageResponse<InvoiceResponse>>> {
    let today = today();
    let filter = InvoiceQuery {
        status: parse_filter(query.status.as_deref(), "status", InvoiceStatus::parse)?,
        order_id: query.order_id,
        overdue_on: query.overdue.then_some(today),
        issued_from: query.from,
        issued_to: query.to,
        page: page_request(query.page, query.per_page),
    };
    let page = InvoiceRepository::new(state.conn())
        .list(auth.account_id(), &filter)
        .await?;
    Ok(Json(page.map(|invoice| InvoiceResponse::new(invoice, today))))
}

/// GET `/invoices/{id}` - Get an invoice.
async fn get_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<InvoiceResponse>> {
    let invoice = InvoiceRepository::new(state.conn())
        .find(auth.account_id(), id)
        .await?;
    Ok(Json(InvoiceResponse::new(invoice, today())))
}

/// PATCH `/invoices/{id}` - Move the due date of an open invoice.
async fn reschedule_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<RescheduleInvoiceRequest>,
) -> ApiResult<Json<InvoiceResponse>> {
    let invoice = InvoiceRepository::new(state.conn())
        .reschedule(auth.actor(), id, payload.due_on)
        .await?;
    Ok(Json(InvoiceResponse::new(invoice, today())))
}

/// POST `/invoices/{id}/send` - Send a draft invoice.
async fn send_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<InvoiceResponse>> {
    let invoice = InvoiceRepository::new(state.conn())
        .send(auth.actor(), id)
        .await?;
    Ok(Json(InvoiceResponse::new(invoice, today())))
}

/// POST `/invoices/{id}/pay` - Record the payment of a sent invoice.
async fn pay_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<InvoiceResponse>> {
    let invoice = InvoiceRepository::new(state.conn())
        .mark_as_paid(auth.actor(), id)
        .await?;
    Ok(Json(InvoiceResponse::new(invoice, today())))
}

/// POST `/invoices/{id}/cancel` - Cancel an unpaid invoice; its order goes
/// back to validated.
async fn cancel_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<InvoiceResponse>> {
    let invoice = InvoiceRepository::new(state.conn())
        .cancel(auth.actor(), id)
        .await?;
    Ok(Json(InvoiceResponse::new(invoice, today())))
}
