//! Audit trail routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use orderdesk_core::audit::AuditAction;
use orderdesk_shared::types::PageResponse;
use serde::Deserialize;
use uuid::Uuid;

use super::{page_request, parse_filter};
use crate::{AppState, error::ApiResult, middleware::AuthUser, presenters::EventResponse};
use orderdesk_db::{queries::EventQuery, repositories::AuditRepository};

/// Creates the event routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/events", get(list_events))
}

/// Query parameters for listing events.
#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    /// Resource type, e.g. `Order`.
    pub resource_type: Option<String>,
    /// Resource ID.
    pub resource_id: Option<Uuid>,
    /// `created`, `updated` or `deleted`.
    pub action: Option<String>,
    /// Author of the change.
    pub author_id: Option<Uuid>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default 20, max 100).
    pub per_page: Option<u32>,
}

/// GET `/events` - Audit events, newest first.
async fn list_events(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListEventsQuery>,
) -> ApiResult<Json<PageResponse<EventResponse>>> {
    let filter = EventQuery {
        resource_type: query.resource_type,
        resource_id: query.resource_id,
        action: parse_filter(query.action.as_deref(), "action", AuditAction::parse)?,
        author_id: query.author_id,
        page: page_request(query.page, query.per_page),
    };
    let page = AuditRepository::new(state.conn())
        .list(auth.account_id(), &filter)
        .await?;
    Ok(Json(page.map(Into::into)))
}
