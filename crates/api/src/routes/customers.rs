//! Customer routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use orderdesk_shared::types::PageResponse;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{nullable, page_request};
use crate::{
    AppState,
    error::ApiResult,
    extractors::ValidatedJson,
    middleware::AuthUser,
    presenters::CustomerResponse,
};
use orderdesk_db::{
    queries::CustomerQuery,
    repositories::{CreateCustomerInput, CustomerRepository, UpdateCustomerInput},
};

/// Creates the customer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer)
                .patch(update_customer)
                .delete(delete_customer),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for listing customers.
#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    /// Matches name, email or company.
    pub q: Option<String>,
    /// Country code.
    pub country: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default 20, max 100).
    pub per_page: Option<u32>,
}

/// Request body for creating a customer.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    /// Given name.
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    #[serde(default)]
    pub last_name: String,
    /// Email address.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Phone number.
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub phone: Option<String>,
    /// Company name.
    pub company_name: Option<String>,
    /// Street address.
    pub address_line1: Option<String>,
    /// Address complement.
    pub address_line2: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// City.
    pub city: Option<String>,
    /// ISO 3166 alpha-2 country code.
    #[validate(length(equal = 2, message = "must be a two-letter code"))]
    pub country: Option<String>,
}

/// Request body for updating a customer. `null` clears optional fields.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    /// Given name.
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub first_name: Option<String>,
    /// Family name.
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub last_name: Option<String>,
    /// Email address.
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    /// Company name.
    #[serde(default, deserialize_with = "nullable")]
    pub company_name: Option<Option<String>>,
    /// Street address.
    #[serde(default, deserialize_with = "nullable")]
    pub address_line1: Option<Option<String>>,
    /// Address complement.
    #[serde(default, deserialize_with = "nullable")]
    pub address_line2: Option<Option<String>>,
    /// Postal code.
    #[serde(default, deserialize_with = "nullable")]
    pub postal_code: Option<Option<String>>,
    /// City.
    #[serde(default, deserialize_with = "nullable")]
    pub city: Option<Option<String>>,
    /// Country code.
    #[serde(default, deserialize_with = "nullable")]
    pub country: Option<Option<String>>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/customers` - List customers.
async fn list_customers(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListCustomersQuery>,
) -> ApiResult<Json<PageResponse<CustomerResponse>>> {
    let filter = CustomerQuery {
        search: query.q,
        country: query.country,
        page: page_request(query.page, query.per_page),
    };
    let page = CustomerRepository::new(state.conn())
        .list(auth.account_id(), &filter)
        .await?;
    Ok(Json(page.map(Into::into)))
}

/// POST `/customers` - Create a customer.
async fn create_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateCustomerRequest>,
) -> ApiResult<(StatusCode, Json<CustomerResponse>)> {
    let input = CreateCustomerInput {
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        phone: payload.phone,
        company_name: payload.company_name,
        address_line1: payload.address_line1,
        address_line2: payload.address_line2,
        postal_code: payload.postal_code,
        city: payload.city,
        country: payload.country,
    };
    let customer = CustomerRepository::new(state.conn())
        .create(auth.actor(), input)
        .await?;
    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// GET `/customers/{id}` - Get a customer.
async fn get_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CustomerResponse>> {
    let customer = CustomerRepository::new(state.conn())
        .find(auth.account_id(), id)
        .await?;
    Ok(Json(customer.into()))
}

/// PATCH `/customers/{id}` - Update a customer.
async fn update_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCustomerRequest>,
) -> ApiResult<Json<CustomerResponse>> {
    let input = UpdateCustomerInput {
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        phone: payload.phone,
        company_name: payload.company_name,
        address_line1: payload.address_line1,
        address_line2: payload.address_line2,
        postal_code: payload.postal_code,
        city: payload.city,
        country: payload.country,
    };
    let customer = CustomerRepository::new(state.conn())
        .update(auth.actor(), id, input)
        .await?;
    Ok(Json(customer.into()))
}

/// DELETE `/customers/{id}` - Delete a customer; its orders keep existing.
async fn delete_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    CustomerRepository::new(state.conn())
        .delete(auth.actor(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
