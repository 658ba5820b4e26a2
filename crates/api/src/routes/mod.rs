//! API route definitions.

use axum::{Router, middleware};
use orderdesk_shared::types::{Currency, PageRequest};
use serde::{Deserialize, Deserializer};

use crate::{AppState, error::ApiError, error::ApiResult, middleware::auth_middleware};

pub mod account;
pub mod customers;
pub mod events;
pub mod fulfillment_services;
pub mod fulfillments;
pub mod health;
pub mod invoices;
pub mod orders;
pub mod reports;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Everything but the health check requires a bearer token
    let protected_routes = Router::new()
        .merge(account::routes())
        .merge(customers::routes())
        .merge(orders::routes())
        .merge(invoices::routes())
        .merge(fulfillment_services::routes())
        .merge(fulfillments::routes())
        .merge(events::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}

/// Page parameters of list endpoints, with defaults and bounds applied.
pub(crate) fn page_request(page: Option<u32>, per_page: Option<u32>) -> PageRequest {
    PageRequest::from_query(page, per_page)
}

/// Parses an optional filter value, rejecting unknown values with 400.
pub(crate) fn parse_filter<T>(
    value: Option<&str>,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> ApiResult<Option<T>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => parse(raw)
            .map(Some)
            .ok_or_else(|| ApiError::bad_request(format!("unknown {name} '{raw}'"))),
    }
}

/// Parses an optional ISO 4217 code.
pub(crate) fn parse_currency(value: Option<&str>) -> ApiResult<Option<Currency>> {
    value
        .map(|code| code.parse::<Currency>().map_err(ApiError::bad_request))
        .transpose()
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in PATCH bodies.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderdesk_core::order::OrderStatus;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        notes: Option<Option<String>>,
    }

    #[test]
    fn test_nullable_distinguishes_absent_and_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.notes, None);

        let null: Patch = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        assert_eq!(null.notes, Some(None));

        let set: Patch = serde_json::from_str(r#"{"notes": "x"}"#).unwrap();
        assert_eq!(set.notes, Some(Some("x".to_string())));
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter(Some("validated"), "status", OrderStatus::parse).unwrap(),
            Some(OrderStatus::Validated)
        );
        assert_eq!(
            parse_filter(Some(" "), "status", OrderStatus::parse).unwrap(),
            None
        );
        assert!(parse_filter(Some("shipped"), "status", OrderStatus::parse).is_err());
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency(Some("usd")).unwrap(), Some(Currency::Usd));
        assert!(parse_currency(Some("XXX")).is_err());
        assert_eq!(parse_currency(None).unwrap(), None);
    }
}
