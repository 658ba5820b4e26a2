//! Routes for the authenticated account's settings.

use axum::{Json, Router, extract::State, routing::get};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use super::parse_currency;
use crate::{
    AppState,
    error::ApiResult,
    extractors::ValidatedJson,
    middleware::AuthUser,
    presenters::AccountResponse,
};
use orderdesk_db::repositories::{AccountRepository, UpdateAccountInput};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/account", get(get_account).patch(update_account))
}

/// Request body for updating account settings.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    /// Display name.
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    /// Default currency of new orders.
    pub currency: Option<String>,
    /// Default tax rate, as a fraction.
    pub default_tax_rate: Option<Decimal>,
    /// Invoice number prefix.
    #[validate(length(min = 1, max = 20, message = "must be 1-20 characters"))]
    pub invoice_prefix: Option<String>,
}

/// GET `/account` - Settings of the current account.
async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<AccountResponse>> {
    let account = AccountRepository::new(state.conn())
        .find(auth.account_id())
        .await?;
    Ok(Json(account.into()))
}

/// PATCH `/account` - Update settings of the current account.
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateAccountRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let input = UpdateAccountInput {
        name: payload.name,
        currency: parse_currency(payload.currency.as_deref())?,
        default_tax_rate: payload.default_tax_rate,
        invoice_prefix: payload.invoice_prefix,
    };
    let account = AccountRepository::new(state.conn())
        .update(auth.account_id(), input)
        .await?;
    tracing::info!(account_id = %account.id, "account settings updated");
    Ok(Json(account.into()))
}
