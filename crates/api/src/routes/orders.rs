//! Order routes: orders, their lines and the lifecycle actions that start
//! from an order (validate, invoice, fulfill, cancel).

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use chrono::{NaiveDate, Utc};
use orderdesk_core::order::OrderStatus;
use orderdesk_shared::types::PageResponse;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{nullable, page_request, parse_currency, parse_filter};
use crate::{
    AppState,
    error::ApiResult,
    extractors::ValidatedJson,
    middleware::AuthUser,
    presenters::{FulfillmentResponse, InvoiceResponse, OrderResponse},
};
use orderdesk_db::{
    queries::OrderQuery,
    repositories::{
        CreateFulfillmentInput, CreateOrderInput, FulfillmentRepository, NewLineInput,
        OrderRepository, UpdateLineInput, UpdateOrderInput,
    },
    services::{CancelOrder, CreateInvoice, Service},
};

/// Creates the order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/{id}",
            get(get_order).patch(update_order).delete(delete_order),
        )
        .route("/orders/{id}/lines", post(add_line))
        .route(
            "/orders/{id}/lines/{line_id}",
            patch(update_line).delete(remove_line),
        )
        .route("/orders/{id}/validate", post(validate_order))
        .route("/orders/{id}/cancel", post(cancel_order))
        .route("/orders/{id}/invoice", post(create_invoice))
        .route("/orders/{id}/fulfillments", post(create_fulfillment))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing orders.
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    /// Status filter.
    pub status: Option<String>,
    /// Customer filter.
    pub customer_id: Option<Uuid>,
    /// Matches the reference or notes.
    pub q: Option<String>,
    /// Created on or after (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Created on or before (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default 20, max 100).
    pub per_page: Option<u32>,
}

/// A new order line.
#[derive(Debug, Deserialize, Validate)]
pub struct LineRequest {
    /// Description.
    #[validate(length(min = 1, max = 500, message = "must be 1-500 characters"))]
    pub description: String,
    /// Stock keeping unit.
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub sku: Option<String>,
    /// Quantity, at least 1.
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
}

impl From<LineRequest> for NewLineInput {
    fn from(line: LineRequest) -> Self {
        Self {
            description: line.description,
            sku: line.sku,
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

/// Request body for creating an order.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateOrderRequest {
    /// Customer, if known.
    pub customer_id: Option<Uuid>,
    /// Currency; the account default when omitted.
    pub currency: Option<String>,
    /// Free text notes.
    pub notes: Option<String>,
    /// Initial lines.
    #[validate(nested)]
    pub lines: Vec<LineRequest>,
}

/// Request body for updating an order header.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    /// New customer; `null` detaches the customer.
    #[serde(default, deserialize_with = "nullable")]
    pub customer_id: Option<Option<Uuid>>,
    /// New notes; `null` clears them.
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

/// Request body for changing a line.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLineRequest {
    /// Description.
    #[validate(length(min = 1, max = 500, message = "must be 1-500 characters"))]
    pub description: Option<String>,
    /// SKU; `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    pub sku: Option<Option<String>>,
    /// Quantity.
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub quantity: Option<i32>,
    /// Price per unit.
    pub unit_price: Option<Decimal>,
}

/// Request body for cancelling an order.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CancelOrderRequest {
    /// Why the order was cancelled.
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub reason: Option<String>,
}

/// Request body for invoicing an order.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateInvoiceRequest {
    /// Tax rate as a fraction; the account default when omitted.
    pub tax_rate: Option<Decimal>,
    /// Payment term in days; the configured default when omitted.
    #[validate(range(max = 365, message = "must be at most 365"))]
    pub due_in_days: Option<u32>,
}

/// Request body for creating a fulfillment.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateFulfillmentRequest {
    /// Fulfillment service handling the shipment.
    pub fulfillment_service_id: Option<Uuid>,
    /// Carrier; the service's carrier when omitted.
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub carrier: Option<String>,
    /// Tracking number, if already known.
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub tracking_number: Option<String>,
}

/// Response of a cancellation.
#[derive(Debug, Serialize)]
pub struct CancelOrderResponse {
    /// The cancelled order.
    pub order: OrderResponse,
    /// Invoice cancelled along, if any.
    pub invoice: Option<InvoiceResponse>,
    /// Fulfillments cancelled along.
    pub fulfillments: Vec<FulfillmentResponse>,
}

/// Response of an invoice creation.
#[derive(Debug, Serialize)]
pub struct InvoicedOrderResponse {
    /// The new draft invoice.
    pub invoice: InvoiceResponse,
    /// The order, now invoiced.
    pub order: OrderResponse,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/orders` - List orders with filters.
async fn list_orders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListOrdersQuery>,
) -> ApiResult<Json<PageResponse<OrderResponse>>> {
    let filter = OrderQuery {
        status: parse_filter(query.status.as_deref(), "status", OrderStatus::parse)?,
        customer_id: query.customer_id,
        search: query.q,
        created_from: query.from,
        created_to: query.to,
        page: page_request(query.page, query.per_page),
    };
    let page = OrderRepository::new(state.conn())
        .list(auth.account_id(), &filter)
        .await?;
    Ok(Json(page.map(Into::into)))
}

/// POST `/orders` - Create a pending order.
async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<OrderResponse>)> {
    let input = CreateOrderInput {
        customer_id: payload.customer_id,
        currency: parse_currency(payload.currency.as_deref())?,
        notes: payload.notes,
        lines: payload.lines.into_iter().map(Into::into).collect(),
    };
    let created = OrderRepository::new(state.conn())
        .create(auth.actor(), input)
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET `/orders/{id}` - Get an order with its lines.
async fn get_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<OrderResponse>> {
    let order = OrderRepository::new(state.conn())
        .find_with_lines(auth.account_id(), id)
        .await?;
    Ok(Json(order.into()))
}

/// PATCH `/orders/{id}` - Update customer or notes.
async fn update_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateOrderRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let input = UpdateOrderInput {
        customer_id: payload.customer_id,
        notes: payload.notes,
    };
    let order = OrderRepository::new(state.conn())
        .update(auth.actor(), id, input)
        .await?;
    Ok(Json(order.into()))
}

/// DELETE `/orders/{id}` - Delete a pending or cancelled order.
async fn delete_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    OrderRepository::new(state.conn())
        .delete(auth.actor(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/orders/{id}/lines` - Add a line to a pending order.
async fn add_line(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<LineRequest>,
) -> ApiResult<(StatusCode, Json<OrderResponse>)> {
    let order = OrderRepository::new(state.conn())
        .add_line(auth.actor(), id, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// PATCH `/orders/{id}/lines/{line_id}` - Change a line of a pending order.
async fn update_line(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, line_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(payload): ValidatedJson<UpdateLineRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let input = UpdateLineInput {
        description: payload.description,
        sku: payload.sku,
        quantity: payload.quantity,
        unit_price: payload.unit_price,
    };
    let order = OrderRepository::new(state.conn())
        .update_line(auth.actor(), id, line_id, input)
        .await?;
    Ok(Json(order.into()))
}

/// DELETE `/orders/{id}/lines/{line_id}` - Remove a line from a pending order.
async fn remove_line(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, line_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<OrderResponse>> {
    let order = OrderRepository::new(state.conn())
        .remove_line(auth.actor(), id, line_id)
        .await?;
    Ok(Json(order.into()))
}

/// POST `/orders/{id}/validate` - Freeze a pending order.
async fn validate_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<OrderResponse>> {
    let order = OrderRepository::new(state.conn())
        .validate(auth.actor(), id)
        .await?;
    Ok(Json(order.into()))
}

/// POST `/orders/{id}/cancel` - Cancel an order with its invoice and open
/// fulfillments.
async fn cancel_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CancelOrderRequest>,
) -> ApiResult<Json<CancelOrderResponse>> {
    let result = CancelOrder::new(state.conn(), auth.actor(), id, payload.reason)
        .call()
        .await?;
    let today = Utc::now().date_naive();
    Ok(Json(CancelOrderResponse {
        order: result.order.into(),
        invoice: result.invoice.map(|i| InvoiceResponse::new(i, today)),
        fulfillments: result.fulfillments.into_iter().map(Into::into).collect(),
    }))
}

/// POST `/orders/{id}/invoice` - Issue a draft invoice for a validated order.
async fn create_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateInvoiceRequest>,
) -> ApiResult<(StatusCode, Json<InvoicedOrderResponse>)> {
    let result = CreateInvoice::new(state.conn(), auth.actor(), id)
        .tax_rate(payload.tax_rate)
        .due_in_days(payload.due_in_days)
        .default_due_days(state.billing.invoice_due_days)
        .call()
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(InvoicedOrderResponse {
            invoice: InvoiceResponse::new(result.invoice, Utc::now().date_naive()),
            order: result.order.into(),
        }),
    ))
}

/// POST `/orders/{id}/fulfillments` - Start a shipment for the order.
async fn create_fulfillment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateFulfillmentRequest>,
) -> ApiResult<(StatusCode, Json<FulfillmentResponse>)> {
    let input = CreateFulfillmentInput {
        fulfillment_service_id: payload.fulfillment_service_id,
        carrier: payload.carrier,
        tracking_number: payload.tracking_number,
    };
    let fulfillment = FulfillmentRepository::new(state.conn())
        .create(auth.actor(), id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(fulfillment.into())))
}
