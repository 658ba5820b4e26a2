//! Fulfillment listing query.

use orderdesk_core::fulfillment::FulfillmentStatus;
use orderdesk_shared::types::PageRequest;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select};
use uuid::Uuid;

use crate::entities::{fulfillments, sea_orm_active_enums};

/// Filters for listing fulfillments.
#[derive(Debug, Clone, Default)]
pub struct FulfillmentQuery {
    /// Only fulfillments in this status.
    pub status: Option<FulfillmentStatus>,
    /// Only fulfillments of this order.
    pub order_id: Option<Uuid>,
    /// Only fulfillments handled by this service.
    pub fulfillment_service_id: Option<Uuid>,
    /// Requested page.
    pub page: PageRequest,
}

impl FulfillmentQuery {
    /// Builds the select, newest first.
    #[must_use]
    pub fn select(&self, account_id: Uuid) -> Select<fulfillments::Entity> {
        let mut select =
            fulfillments::Entity::find().filter(fulfillments::Column::AccountId.eq(account_id));

        if let Some(status) = self.status {
            select = select.filter(
                fulfillments::Column::Status
                    .eq(sea_orm_active_enums::FulfillmentStatus::from(status)),
            );
        }
        if let Some(order_id) = self.order_id {
            select = select.filter(fulfillments::Column::OrderId.eq(order_id));
        }
        if let Some(service_id) = self.fulfillment_service_id {
            select = select.filter(fulfillments::Column::FulfillmentServiceId.eq(service_id));
        }

        select
            .order_by_desc(fulfillments::Column::CreatedAt)
            .order_by_desc(fulfillments::Column::Id)
    }
}
