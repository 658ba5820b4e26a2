//! Fulfillment routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use orderdesk_core::fulfillment::FulfillmentStatus;
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
    presenters::FulfillmentResponse,
};
use orderdesk_db::{
    queries::FulfillmentQuery,
    repositories::{FulfillmentRepository, ShipmentInput},
};

/// Creates the fulfillment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fulfillments", get(list_fulfillments))
        .route("/fulfillments/{id}", get(get_fulfillment))
        .route("/fulfillments/{id}/process", post(process_fulfillment))
        .route("/fulfillments/{id}/ship", post(ship_fulfillment))
        .route("/fulfillments/{id}/deliver", post(deliver_fulfillment))
        .route("/fulfillments/{id}/cancel", post(cancel_fulfillment))
}

/// Query parameters for listing fulfillments.
#[derive(Debug, Deserialize)]
pub struct ListFulfillmentsQuery {
    /// Status filter.
    pub status: Option<String>,
    /// Fulfillments of one order.
    pub order_id: Option<Uuid>,
    /// Fulfillments of one service.
    pub fulfillment_service_id: Option<Uuid>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default 20, max 100).
    pub per_page: Option<u32>,
}

/// Request body for shipping.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ShipRequest {
    /// Carrier, overriding the one set at creation.
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub carrier: Option<String>,
    /// Tracking number.
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub tracking_number: Option<String>,
    /// Explicit tracking page, overriding the service template.
    #[validate(url(message = "must be a valid URL"))]
    pub tracking_url: Option<String>,
}

/// GET `/fulfillments` - List fulfillments with filters.
async fn list_fulfillments(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListFulfillmentsQuery>,
) -> ApiResult<Json<PageResponse<FulfillmentResponse>>> {
    let filter = FulfillmentQuery {
        status: parse_filter(query.status.as_deref(), "status", FulfillmentStatus::parse)?,
        order_id: query.order_id,
        fulfillment_service_id: query.fulfillment_service_id,
        page: page_request(query.page, query.per_page),
    };
    let page = FulfillmentRepository::new(state.conn())
        .list(auth.account_id(), &filter)
        .await?;
    Ok(Json(page.map(Into::into)))
}

/// GET `/fulfillments/{id}` - Get a fulfillment.
async fn get_fulfillment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FulfillmentResponse>> {
    let fulfillment = FulfillmentRepository::new(state.conn())
        .find(auth.account_id(), id)
        .await?;
    Ok(Json(fulfillment.into()))
}

/// POST `/fulfillments/{id}/process` - Start processing.
async fn process_fulfillment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FulfillmentResponse>> {
    let fulfillment = FulfillmentRepository::new(state.conn())
        .process(auth.actor(), id)
        .await?;
    Ok(Json(fulfillment.into()))
}

/// POST `/fulfillments/{id}/ship` - Hand over to the carrier.
async fn ship_fulfillment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ShipRequest>,
) -> ApiResult<Json<FulfillmentResponse>> {
    let input = ShipmentInput {
        carrier: payload.carrier,
        tracking_number: payload.tracking_number,
        tracking_url: payload.tracking_url,
    };
    let fulfillment = FulfillmentRepository::new(state.conn())
        .ship(auth.actor(), id, input)
        .await?;
    Ok(Json(fulfillment.into()))
}

/// POST `/fulfillments/{id}/deliver` - Confirm delivery.
async fn deliver_fulfillment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FulfillmentResponse>> {
    let fulfillment = FulfillmentRepository::new(state.conn())
        .deliver(auth.actor(), id)
        .await?;
    Ok(Json(fulfillment.into()))
}

/// POST `/fulfillments/{id}/cancel` - Cancel an unshipped fulfillment.
async fn cancel_fulfillment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FulfillmentResponse>> {
    let fulfillment = FulfillmentRepository::new(state.conn())
        .cancel(auth.actor(), id)
        .await?;
    Ok(Json(fulfillment.into()))
}
