//! Fulfillment service routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::nullable;
use crate::{
    AppState,
    error::ApiResult,
    extractors::ValidatedJson,
    middleware::AuthUser,
    presenters::FulfillmentServiceResponse,
};
use orderdesk_db::repositories::{
    CreateFulfillmentServiceInput, FulfillmentServiceRepository, UpdateFulfillmentServiceInput,
};

/// Creates the fulfillment service routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/fulfillment-services",
            get(list_services).post(create_service),
        )
        .route(
            "/fulfillment-services/{id}",
            get(get_service).patch(update_service).delete(delete_service),
        )
}

/// Query parameters for listing services.
#[derive(Debug, Deserialize)]
pub struct ListServicesQuery {
    /// Only active services.
    #[serde(default)]
    pub active: bool,
}

/// Request body for creating a service.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateServiceRequest {
    /// Unique name within the account.
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    /// Default carrier.
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub carrier: Option<String>,
    /// Tracking URL template containing `{tracking_number}`.
    pub tracking_url_template: Option<String>,
    /// Defaults to true.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Request body for updating a service.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateServiceRequest {
    /// Name.
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    /// Carrier; `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    pub carrier: Option<Option<String>>,
    /// Template; `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    pub tracking_url_template: Option<Option<String>>,
    /// Activation flag.
    pub active: Option<bool>,
}

/// Non-paginated listing.
#[derive(Debug, Serialize)]
pub struct ServiceListResponse {
    /// Services ordered by name.
    pub data: Vec<FulfillmentServiceResponse>,
}

/// GET `/fulfillment-services` - List services by name.
async fn list_services(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListServicesQuery>,
) -> ApiResult<Json<ServiceListResponse>> {
    let services = FulfillmentServiceRepository::new(state.conn())
        .list(auth.account_id(), query.active)
        .await?;
    Ok(Json(ServiceListResponse {
        data: services.into_iter().map(Into::into).collect(),
    }))
}

/// POST `/fulfillment-services` - Create a service.
async fn create_service(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateServiceRequest>,
) -> ApiResult<(StatusCode, Json<FulfillmentServiceResponse>)> {
    let input = CreateFulfillmentServiceInput {
        name: payload.name,
        carrier: payload.carrier,
        tracking_url_template: payload.tracking_url_template,
        active: payload.active,
    };
    let service = FulfillmentServiceRepository::new(state.conn())
        .create(auth.actor(), input)
        .await?;
    Ok((StatusCode::CREATED, Json(service.into())))
}

/// GET `/fulfillment-services/{id}` - Get a service.
async fn get_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FulfillmentServiceResponse>> {
    let service = FulfillmentServiceRepository::new(state.conn())
        .find(auth.account_id(), id)
        .await?;
    Ok(Json(service.into()))
}

/// PATCH `/fulfillment-services/{id}` - Update a service.
async fn update_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateServiceRequest>,
) -> ApiResult<Json<FulfillmentServiceResponse>> {
    let input = UpdateFulfillmentServiceInput {
        name: payload.name,
        carrier: payload.carrier,
        tracking_url_template: payload.tracking_url_template,
        active: payload.active,
    };
    let service = FulfillmentServiceRepository::new(state.conn())
        .update(auth.actor(), id, input)
        .await?;
    Ok(Json(service.into()))
}

/// DELETE `/fulfillment-services/{id}` - Delete a service; its fulfillments
/// keep existing without it.
async fn delete_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    FulfillmentServiceRepository::new(state.conn())
        .delete(auth.actor(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
